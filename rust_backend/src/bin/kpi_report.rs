//! Site KPI report binary
//!
//! Loads a pour or material dataset, computes the dashboard report and prints
//! it as pretty JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Pour dashboard for a catalog project
//! kpi-report pour --project "BU Data Center - Holcim" --year 2021
//!
//! # Material report for an arbitrary file
//! kpi-report material --file deliveries.csv --threshold 5
//!
//! # List configured projects
//! kpi-report projects
//! ```
//!
//! # Environment Variables
//!
//! - `KPI_CONFIG`: Path to `kpi.toml` (default: searched in standard locations)
//! - `KPI_DATA_DIR`: Base directory for catalog dataset paths
//! - `KPI_HISTOGRAM_BINS`: Histogram bin count override
//! - `KPI_OUTLIER_THRESHOLD`: Discrepancy threshold override
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use site_kpi::config::KpiConfig;
use site_kpi::io::{DatasetKind, DatasetLoader};
use site_kpi::routes::{build_material_report, build_pour_dashboard};

#[derive(Parser, Debug)]
#[command(name = "kpi-report")]
#[command(about = "Concrete pour and material KPI reports")]
#[command(version)]
struct CliArgs {
    /// Path to the configuration file
    #[arg(long, env = "KPI_CONFIG")]
    config: Option<PathBuf>,

    /// Base directory for dataset paths from the project catalog
    #[arg(long, env = "KPI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Number of histogram bins (overrides `analysis.histogram_bins`)
    #[arg(long, env = "KPI_HISTOGRAM_BINS")]
    bins: Option<usize>,

    /// Absolute variation above which a material row is a discrepancy
    /// (overrides `analysis.outlier_threshold`)
    #[arg(long, env = "KPI_OUTLIER_THRESHOLD")]
    threshold: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pour KPI histograms and statistics
    Pour(DatasetArgs),
    /// Material variance summary and discrepancies
    Material(DatasetArgs),
    /// List the configured projects and their years
    Projects,
}

#[derive(Args, Debug)]
struct DatasetArgs {
    /// Read this CSV file instead of a catalog dataset
    #[arg(long, conflicts_with_all = ["project", "year"])]
    file: Option<PathBuf>,

    /// Project name from the catalog
    #[arg(long, requires = "year")]
    project: Option<String>,

    /// Year of the project dataset
    #[arg(long, requires = "project")]
    year: Option<i32>,
}

#[derive(Serialize)]
struct ProjectListing<'a> {
    name: &'a str,
    years: &'a [i32],
    has_material_data: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    let mut loader = DatasetLoader::new(&config);
    if let Some(dir) = &args.data_dir {
        loader = loader.with_base_dir(dir.clone());
    }

    match &args.command {
        Command::Pour(dataset) => {
            let data = match dataset.file.as_deref() {
                Some(path) => DatasetLoader::load_pour_file(path)?,
                None => {
                    let (project, year) = dataset.selection(DatasetKind::Pour)?;
                    loader.load_pour(project, year)?
                }
            };
            let dashboard = build_pour_dashboard(&data.rows, &config.analysis)?;
            print_json(&dashboard)
        }
        Command::Material(dataset) => {
            let data = match dataset.file.as_deref() {
                Some(path) => DatasetLoader::load_material_file(path)?,
                None => {
                    let (project, year) = dataset.selection(DatasetKind::Material)?;
                    loader.load_material(project, year)?
                }
            };
            let report = build_material_report(&data.rows, &config.analysis)?;
            if !report.has_data {
                warn!("No material data available in {}", data.path.display());
            }
            print_json(&report)
        }
        Command::Projects => {
            let listing: Vec<ProjectListing> = config
                .projects
                .iter()
                .map(|p| ProjectListing {
                    name: &p.name,
                    years: &p.years,
                    has_material_data: p.material_file.is_some(),
                })
                .collect();
            print_json(&listing)
        }
    }
}

impl DatasetArgs {
    fn selection(&self, kind: DatasetKind) -> Result<(&str, i32)> {
        match (&self.project, self.year) {
            (Some(project), Some(year)) => Ok((project.as_str(), year)),
            _ => bail!("Select a {} dataset with --file or --project and --year", kind),
        }
    }
}

/// Read the configuration file and apply command-line overrides.
fn load_config(args: &CliArgs) -> Result<KpiConfig> {
    let mut config = match &args.config {
        Some(path) => KpiConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => match KpiConfig::default_location() {
            Some(path) => {
                info!("Using configuration from {}", path.display());
                KpiConfig::from_file(&path)?
            }
            None => {
                info!("No kpi.toml found; using built-in defaults");
                KpiConfig::default()
            }
        },
    };

    if let Some(bins) = args.bins {
        config.analysis.histogram_bins = bins;
    }
    if let Some(threshold) = args.threshold {
        config.analysis.outlier_threshold = threshold;
    }
    config.analysis.validate()?;

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
