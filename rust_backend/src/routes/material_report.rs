use serde::{Deserialize, Serialize};

use crate::config::AnalysisSettings;
use crate::core::domain::{Discrepancy, HistogramBin, MaterialRecord, MaterialVariance};
use crate::error::KpiResult;
use crate::services::material_variance::MaterialSummary;

// =========================================================
// Material report types + route
// =========================================================

/// One labelled summary figure.
///
/// `value` is `None` when there was nothing to average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub label: String,
    pub value: Option<f64>,
}

impl SummaryEntry {
    fn new(label: &str, value: Option<f64>) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Complete material variance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialReport {
    pub row_count: usize,
    pub summary: Vec<SummaryEntry>,
    pub variances: Vec<MaterialVariance>,
    pub discrepancies: Vec<Discrepancy>,
    pub discrepancy_threshold: f64,
    pub variation_histogram: Vec<HistogramBin>,
    pub has_data: bool,
    pub has_discrepancies: bool,
}

/// Route name constant for the material report
pub const GET_MATERIAL_REPORT: &str = "get_material_report";

/// Summary figures in display order.
pub fn summary_entries(summary: &MaterialSummary) -> Vec<SummaryEntry> {
    vec![
        SummaryEntry::new("Total Required", Some(summary.total_required)),
        SummaryEntry::new("Total Batched", Some(summary.total_batched)),
        SummaryEntry::new("Total Variation", Some(summary.total_variation)),
        SummaryEntry::new("Average Variation", summary.average_variation),
    ]
}

/// Compute material variances and assemble the report.
pub fn build_material_report(
    records: &[MaterialRecord],
    settings: &AnalysisSettings,
) -> KpiResult<MaterialReport> {
    let calculator = settings.variance_calculator()?;
    let binner = settings.binner()?;

    let result = calculator.compute(records);
    let variation_histogram = binner.bin(result.rows.iter().map(|r| r.absolute_variation));

    Ok(MaterialReport {
        row_count: result.rows.len(),
        summary: summary_entries(&result.summary),
        has_data: result.has_data(),
        has_discrepancies: result.has_discrepancies(),
        discrepancy_threshold: calculator.outlier_threshold(),
        variation_histogram,
        variances: result.rows,
        discrepancies: result.discrepancies,
    })
}
