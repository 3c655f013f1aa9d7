//! Site KPI backend - concrete pour and material delivery analytics
//!
//! Loads pour and material exports from CSV, derives per-event duration KPIs
//! and per-material variances, and bins KPI series into histograms for the
//! dashboard.
//!
//! # Example
//!
//! ```no_run
//! use site_kpi::config::KpiConfig;
//! use site_kpi::io::DatasetLoader;
//! use site_kpi::routes::build_pour_dashboard;
//!
//! let config = KpiConfig::default();
//! let dataset = DatasetLoader::new(&config)
//!     .load_pour("421 Park Drive", 2023)
//!     .expect("Failed to load");
//! let dashboard = build_pour_dashboard(&dataset.rows, &config.analysis)
//!     .expect("Failed to build dashboard");
//! println!("{} pour events", dashboard.row_count);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod routes;
pub mod services;
pub mod time;

pub use config::{AnalysisSettings, KpiConfig, ProjectSettings};
pub use error::{KpiError, KpiResult};
