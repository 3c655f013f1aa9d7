//! KPI computation services.
//!
//! Pure transforms over in-memory rows. Each service is stateless apart from
//! its configuration (bin count, discrepancy threshold) and performs no I/O.
//!
//! - [`pour_kpis`]: durations and pour speed per pour event
//! - [`material_variance`]: per-row variance, totals and discrepancy table
//! - [`histogram`]: equal-width binning of any numeric series
//! - [`statistics`]: descriptive statistics per KPI column

pub mod histogram;
pub mod material_variance;
pub mod pour_kpis;
pub mod statistics;

pub use histogram::{bin_values, Histogram, HistogramBinner, DEFAULT_BIN_COUNT};
pub use material_variance::{
    compute_material_variance, MaterialSummary, MaterialVarianceCalculator,
    MaterialVarianceResult, DEFAULT_OUTLIER_THRESHOLD,
};
pub use pour_kpis::{compute_pour_kpis, pour_speed, DurationKpiCalculator};
pub use statistics::{compute_stats, pour_kpi_stats, KpiStats, KpiStatsRow};
