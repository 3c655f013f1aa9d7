#![allow(clippy::manual_is_multiple_of)]

use serde::{Deserialize, Serialize};

use crate::core::domain::{KpiKind, PourEventKpis};

/// Descriptive statistics of one KPI column.
///
/// Computed over present, finite values only. An empty column reports
/// `count == 0` and zeros elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

/// Statistics row for one pour KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiStatsRow {
    pub kpi: KpiKind,
    pub title: String,
    pub absent: usize,
    pub stats: KpiStats,
}

/// Compute statistics for a set of values.
/// Calculates count, mean, median, population std dev, min, max, and sum.
pub fn compute_stats(values: &[f64]) -> KpiStats {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return KpiStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
        };
    }

    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();
    let mean = sum / count as f64;

    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = sorted
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    KpiStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        sum,
    }
}

/// Statistics for every pour KPI, in dashboard order.
pub fn pour_kpi_stats(rows: &[PourEventKpis]) -> Vec<KpiStatsRow> {
    KpiKind::ALL
        .iter()
        .map(|kind| {
            let values: Vec<f64> = rows.iter().filter_map(|r| kind.value(&r.kpis)).collect();
            KpiStatsRow {
                kpi: *kind,
                title: kind.title().to_string(),
                absent: rows.len() - values.len(),
                stats: compute_stats(&values),
            }
        })
        .collect()
}
