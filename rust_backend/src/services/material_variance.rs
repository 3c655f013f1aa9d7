//! Required vs. batched material variance.
//!
//! Every material line item is enriched with its absolute and relative
//! variation. The dataset is summarized with totals and the mean variation,
//! and rows whose absolute variation exceeds a threshold are reported as
//! significant discrepancies.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::domain::{Discrepancy, MaterialRecord, MaterialVariance};
use crate::error::{KpiError, KpiResult};

/// Absolute variation above which a row is a significant discrepancy.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 10.0;

/// Aggregates over all material rows.
///
/// Absent quantities are skipped by the sums and the mean. `average_variation`
/// is `None` when no row has a variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSummary {
    pub total_required: f64,
    pub total_batched: f64,
    pub total_variation: f64,
    pub average_variation: Option<f64>,
}

/// Output of [`MaterialVarianceCalculator::compute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialVarianceResult {
    pub rows: Vec<MaterialVariance>,
    pub summary: MaterialSummary,
    pub discrepancies: Vec<Discrepancy>,
}

impl MaterialVarianceResult {
    /// `false` when the input dataset had no rows at all.
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// `true` when at least one row crossed the discrepancy threshold.
    pub fn has_discrepancies(&self) -> bool {
        !self.discrepancies.is_empty()
    }
}

/// Computes per-row variances, the dataset summary and the discrepancy table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialVarianceCalculator {
    outlier_threshold: f64,
}

impl Default for MaterialVarianceCalculator {
    fn default() -> Self {
        Self {
            outlier_threshold: DEFAULT_OUTLIER_THRESHOLD,
        }
    }
}

impl MaterialVarianceCalculator {
    /// Create a calculator with a custom discrepancy threshold.
    ///
    /// The threshold must be finite and non-negative.
    pub fn new(outlier_threshold: f64) -> KpiResult<Self> {
        if !outlier_threshold.is_finite() || outlier_threshold < 0.0 {
            return Err(KpiError::InvalidArgument(format!(
                "outlier_threshold must be a finite, non-negative number (got {})",
                outlier_threshold
            )));
        }
        Ok(Self { outlier_threshold })
    }

    pub fn outlier_threshold(&self) -> f64 {
        self.outlier_threshold
    }

    /// Enrich, summarize and select discrepancies in one pass over `rows`.
    pub fn compute(&self, rows: &[MaterialRecord]) -> MaterialVarianceResult {
        let enriched: Vec<MaterialVariance> = rows.iter().map(enrich).collect();
        let summary = summarize(&enriched);
        let discrepancies = self.discrepancies(&enriched);

        debug!(
            "Material variance: {} rows, {} discrepancies above {}",
            enriched.len(),
            discrepancies.len(),
            self.outlier_threshold
        );

        MaterialVarianceResult {
            rows: enriched,
            summary,
            discrepancies,
        }
    }

    /// Rows whose `|absolute_variation|` is strictly above the threshold,
    /// in their original order.
    pub fn discrepancies(&self, rows: &[MaterialVariance]) -> Vec<Discrepancy> {
        rows.iter()
            .filter_map(|row| {
                let variation = row.absolute_variation?;
                (variation.abs() > self.outlier_threshold).then(|| Discrepancy {
                    material: row.material.clone(),
                    required_qty: row.required_qty,
                    batched_qty: row.batched_qty,
                    absolute_variation: variation,
                })
            })
            .collect()
    }
}

/// `(absolute_variation, variation_percent)` for one pair of quantities.
///
/// The percentage is computed without a zero guard, so a zero requirement
/// yields `inf`, `-inf` or `NaN`.
pub fn variation(required_qty: Option<f64>, batched_qty: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (required_qty, batched_qty) {
        (Some(required), Some(batched)) => {
            let absolute = batched - required;
            (Some(absolute), Some(absolute / required * 100.0))
        }
        _ => (None, None),
    }
}

fn enrich(record: &MaterialRecord) -> MaterialVariance {
    let (absolute_variation, variation_percent) =
        variation(record.required_qty, record.batched_qty);
    MaterialVariance {
        material: record.material.clone(),
        required_qty: record.required_qty,
        batched_qty: record.batched_qty,
        absolute_variation,
        variation_percent,
    }
}

fn summarize(rows: &[MaterialVariance]) -> MaterialSummary {
    let total_required = rows.iter().filter_map(|r| r.required_qty).sum();
    let total_batched = rows.iter().filter_map(|r| r.batched_qty).sum();

    let variations: Vec<f64> = rows.iter().filter_map(|r| r.absolute_variation).collect();
    let total_variation: f64 = variations.iter().sum();
    let average_variation =
        (!variations.is_empty()).then(|| total_variation / variations.len() as f64);

    MaterialSummary {
        total_required,
        total_batched,
        total_variation,
        average_variation,
    }
}

/// Convenience wrapper using the default threshold.
pub fn compute_material_variance(rows: &[MaterialRecord]) -> MaterialVarianceResult {
    MaterialVarianceCalculator::default().compute(rows)
}
