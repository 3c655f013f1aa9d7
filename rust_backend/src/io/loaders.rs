use anyhow::{Context, Result};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{KpiConfig, ProjectSettings};
use crate::core::domain::{MaterialRecord, RawPourRecord};
use crate::error::{KpiError, KpiResult};
use crate::parsing::csv_parser;

/// Which dataset of a project to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Pour,
    Material,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Pour => write!(f, "pour"),
            DatasetKind::Material => write!(f, "material"),
        }
    }
}

/// Result of loading one dataset
#[derive(Debug, Clone)]
pub struct DatasetLoadResult<T> {
    pub path: PathBuf,
    pub kind: DatasetKind,
    pub rows: Vec<T>,
    pub num_rows: usize,
}

impl<T> DatasetLoadResult<T> {
    pub fn new(path: PathBuf, kind: DatasetKind, rows: Vec<T>) -> Self {
        let num_rows = rows.len();
        Self {
            path,
            kind,
            rows,
            num_rows,
        }
    }
}

/// Resolves `(project, year, kind)` through the project catalog and loads
/// the matching CSV file.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    projects: Vec<ProjectSettings>,
    base_dir: Option<PathBuf>,
}

impl DatasetLoader {
    pub fn new(config: &KpiConfig) -> Self {
        Self {
            projects: config.projects.clone(),
            base_dir: None,
        }
    }

    /// Resolve relative dataset paths against `dir` instead of the working
    /// directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Resolve the file path of a dataset.
    ///
    /// Fails with `KpiError::NotFound` for an unknown project or a project
    /// without that kind of dataset, and `KpiError::InvalidArgument` for a
    /// year the project does not offer.
    pub fn resolve(&self, project: &str, year: i32, kind: DatasetKind) -> KpiResult<PathBuf> {
        let settings = self
            .projects
            .iter()
            .find(|p| p.name == project)
            .ok_or_else(|| KpiError::NotFound(format!("Unknown project '{}'", project)))?;

        if !settings.offers_year(year) {
            return Err(KpiError::InvalidArgument(format!(
                "Year {} is not available for project '{}' (available: {:?})",
                year, project, settings.years
            )));
        }

        let path = match kind {
            DatasetKind::Pour => settings.pour_path(year),
            DatasetKind::Material => settings.material_path(year).ok_or_else(|| {
                KpiError::NotFound(format!("Project '{}' has no material dataset", project))
            })?,
        };

        Ok(match &self.base_dir {
            Some(base) => base.join(path),
            None => path,
        })
    }

    /// Load the pour dataset of a project for one year
    pub fn load_pour(&self, project: &str, year: i32) -> Result<DatasetLoadResult<RawPourRecord>> {
        let path = self.resolve(project, year, DatasetKind::Pour)?;
        info!("Loading pour data for '{}' ({}) from {}", project, year, path.display());
        Self::load_pour_file(&path)
    }

    /// Load the material dataset of a project for one year
    pub fn load_material(
        &self,
        project: &str,
        year: i32,
    ) -> Result<DatasetLoadResult<MaterialRecord>> {
        let path = self.resolve(project, year, DatasetKind::Material)?;
        info!(
            "Loading material data for '{}' ({}) from {}",
            project,
            year,
            path.display()
        );
        Self::load_material_file(&path)
    }

    /// Load a pour CSV file directly
    pub fn load_pour_file(path: &Path) -> Result<DatasetLoadResult<RawPourRecord>> {
        let rows = csv_parser::parse_pour_csv(path).context("Failed to load pour dataset")?;
        info!("Loaded {} pour rows", rows.len());
        Ok(DatasetLoadResult::new(
            path.to_path_buf(),
            DatasetKind::Pour,
            rows,
        ))
    }

    /// Load a material CSV file directly
    pub fn load_material_file(path: &Path) -> Result<DatasetLoadResult<MaterialRecord>> {
        let rows =
            csv_parser::parse_material_csv(path).context("Failed to load material dataset")?;
        info!("Loaded {} material rows", rows.len());
        Ok(DatasetLoadResult::new(
            path.to_path_buf(),
            DatasetKind::Material,
            rows,
        ))
    }
}
