//! High-level data loading utilities.
//!
//! This module provides loaders that resolve a project's datasets through the
//! configured catalog and parse them into row types. Loaders attach file-level
//! error context and log what they read.
//!
//! # Example
//!
//! ```no_run
//! use site_kpi::config::KpiConfig;
//! use site_kpi::io::loaders::DatasetLoader;
//!
//! let loader = DatasetLoader::new(&KpiConfig::default());
//! let result = loader
//!     .load_pour("BU Data Center - Holcim", 2021)
//!     .expect("Failed to load");
//! println!("Loaded {} pour rows", result.num_rows);
//! ```

pub mod loaders;


pub use loaders::{DatasetKind, DatasetLoadResult, DatasetLoader};
