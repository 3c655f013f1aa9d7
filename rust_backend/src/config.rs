//! KPI configuration file support.
//!
//! This module reads analysis settings and the project catalog from a
//! `kpi.toml` file. Every section is optional; omitted values fall back to
//! the dashboard defaults.
//!
//! ```toml
//! [analysis]
//! histogram_bins = 20
//! outlier_threshold = 10.0
//!
//! [[projects]]
//! name = "BU Data Center - Holcim"
//! years = [2020, 2021, 2022, 2023]
//! pour_file = "BU Data/pour {year}.csv"
//! material_file = "BU Data/material {year}.csv"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{KpiError, KpiResult};
use crate::services::histogram::{HistogramBinner, DEFAULT_BIN_COUNT};
use crate::services::material_variance::{MaterialVarianceCalculator, DEFAULT_OUTLIER_THRESHOLD};

/// Placeholder substituted with the selected year in file templates.
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// KPI configuration from file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiConfig {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default = "default_projects")]
    pub projects: Vec<ProjectSettings>,
}

/// Histogram and discrepancy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_outlier_threshold")]
    pub outlier_threshold: f64,
}

/// One entry of the project catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub name: String,
    pub years: Vec<i32>,
    pub pour_file: String,
    #[serde(default)]
    pub material_file: Option<String>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_histogram_bins() -> usize {
    DEFAULT_BIN_COUNT
}

fn default_outlier_threshold() -> f64 {
    DEFAULT_OUTLIER_THRESHOLD
}

fn default_projects() -> Vec<ProjectSettings> {
    vec![
        ProjectSettings {
            name: "421 Park Drive".to_string(),
            years: vec![2023],
            pour_file: "pour data_2023.csv".to_string(),
            material_file: None,
            data_dir: None,
        },
        ProjectSettings {
            name: "BU Data Center - Holcim".to_string(),
            years: vec![2020, 2021, 2022, 2023],
            pour_file: "BU Data/pour {year}.csv".to_string(),
            material_file: None,
            data_dir: None,
        },
    ]
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
            outlier_threshold: default_outlier_threshold(),
        }
    }
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisSettings::default(),
            projects: default_projects(),
        }
    }
}

impl AnalysisSettings {
    /// Check the settings without building anything.
    pub fn validate(&self) -> KpiResult<()> {
        self.binner()?;
        self.variance_calculator()?;
        Ok(())
    }

    /// Histogram binner for the configured bin count.
    pub fn binner(&self) -> KpiResult<HistogramBinner> {
        HistogramBinner::new(self.histogram_bins).map_err(|e| {
            KpiError::Configuration(format!("Invalid 'analysis.histogram_bins': {}", e))
        })
    }

    /// Variance calculator for the configured discrepancy threshold.
    pub fn variance_calculator(&self) -> KpiResult<MaterialVarianceCalculator> {
        MaterialVarianceCalculator::new(self.outlier_threshold).map_err(|e| {
            KpiError::Configuration(format!("Invalid 'analysis.outlier_threshold': {}", e))
        })
    }
}

impl ProjectSettings {
    pub fn offers_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    /// Path of the pour dataset for `year`.
    pub fn pour_path(&self, year: i32) -> PathBuf {
        self.resolve(&self.pour_file, year)
    }

    /// Path of the material dataset for `year`, if the project has one.
    pub fn material_path(&self, year: i32) -> Option<PathBuf> {
        self.material_file
            .as_deref()
            .map(|template| self.resolve(template, year))
    }

    fn resolve(&self, template: &str, year: i32) -> PathBuf {
        let file = template.replace(YEAR_PLACEHOLDER, &year.to_string());
        match &self.data_dir {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

impl KpiConfig {
    /// Load KPI configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(KpiConfig)` if the file was read, parsed and validated
    /// * `Err(KpiError::Configuration)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> KpiResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            KpiError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        content.parse()
    }

    /// Load KPI configuration from the default location.
    ///
    /// Searches for `kpi.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> KpiResult<Self> {
        match Self::default_location() {
            Some(path) => Self::from_file(&path),
            None => Err(KpiError::Configuration(
                "No kpi.toml found in standard locations".to_string(),
            )),
        }
    }

    /// First existing `kpi.toml` among the standard locations.
    pub fn default_location() -> Option<PathBuf> {
        let search_paths = [
            PathBuf::from("kpi.toml"),
            PathBuf::from("rust_backend/kpi.toml"),
            PathBuf::from("../kpi.toml"),
        ];

        search_paths.into_iter().find(|path| path.exists())
    }

    /// Validate analysis settings and the project catalog.
    pub fn validate(&self) -> KpiResult<()> {
        self.analysis.validate()?;

        let mut names = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(KpiError::Configuration(
                    "Project entries require a 'name'".to_string(),
                ));
            }
            if !names.insert(project.name.as_str()) {
                return Err(KpiError::Configuration(format!(
                    "Duplicate project '{}'",
                    project.name
                )));
            }
            if project.years.is_empty() {
                return Err(KpiError::Configuration(format!(
                    "Project '{}' requires at least one year",
                    project.name
                )));
            }
            if project.pour_file.trim().is_empty() {
                return Err(KpiError::Configuration(format!(
                    "Project '{}' requires a 'pour_file'",
                    project.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a project by its display name.
    pub fn project(&self, name: &str) -> KpiResult<&ProjectSettings> {
        self.projects
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| KpiError::NotFound(format!("Unknown project '{}'", name)))
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.name.as_str()).collect()
    }
}

impl FromStr for KpiConfig {
    type Err = KpiError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: KpiConfig = toml::from_str(content).map_err(|e| {
            KpiError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }
}
