//! Parsers for site export datasets.
//!
//! CSV files are read with Polars, every column as text, and converted into
//! the row types of [`crate::core::domain`]. Required columns are checked up
//! front; individual cells that do not parse become absent.
//!
//! # Example
//!
//! ```no_run
//! use site_kpi::parsing::csv_parser::parse_pour_csv;
//! use std::path::Path;
//!
//! let rows = parse_pour_csv(Path::new("pour data_2023.csv"))
//!     .expect("Failed to parse pour data");
//! println!("Loaded {} pour rows", rows.len());
//! ```

pub mod csv_parser;


pub use csv_parser::{
    dataframe_to_material_records, dataframe_to_pour_records, parse_material_csv, parse_pour_csv,
};
