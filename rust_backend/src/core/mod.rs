//! Core domain models for concrete pour and material KPIs.
//!
//! This module defines the row types that flow through the pipeline and the
//! fixed column names of the datasets they are loaded from.

pub mod domain;
pub mod schema;

pub use domain::{
    Discrepancy, HistogramBin, KpiKind, MaterialRecord, MaterialVariance, PourEvent,
    PourEventKpis, PourKpis, RawPourRecord,
};
