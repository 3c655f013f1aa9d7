//! Equal-width histogram binning for KPI series.
//!
//! Values are partitioned into `bin_count` equal-width intervals spanning
//! `[min, max]`. Every interval is half-open except the last, which also
//! includes `max`. Bin centers are rounded half-to-even so that chart labels
//! are whole numbers.
//!
//! ## Edge cases
//! - Absent (`None`) and non-finite values are dropped before binning
//! - Empty input (after dropping) yields zero bins
//! - When every value is identical, a single bin of width 1 centered on that
//!   value holds all of them

use log::debug;
use serde::Serialize;

use crate::core::domain::HistogramBin;
use crate::error::{KpiError, KpiResult};

/// Number of bins used by the dashboard charts.
pub const DEFAULT_BIN_COUNT: usize = 20;

/// Raw histogram: `edges.len() == counts.len() + 1` unless empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    fn empty() -> Self {
        Self {
            edges: Vec::new(),
            counts: Vec::new(),
        }
    }

    /// Total number of binned values.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Convert into display bins with rounded centers.
    pub fn bins(&self) -> Vec<HistogramBin> {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| {
                let midpoint = (edge[0] + edge[1]) / 2.0;
                HistogramBin::new(midpoint.round_ties_even() as i64, count)
            })
            .collect()
    }
}

/// Bins numeric series into a fixed number of equal-width intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramBinner {
    bin_count: usize,
}

impl Default for HistogramBinner {
    fn default() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
        }
    }
}

impl HistogramBinner {
    /// Create a binner producing `bin_count` intervals.
    ///
    /// Returns `KpiError::InvalidArgument` when `bin_count` is zero.
    pub fn new(bin_count: usize) -> KpiResult<Self> {
        if bin_count == 0 {
            return Err(KpiError::InvalidArgument(
                "bin_count must be at least 1".to_string(),
            ));
        }
        Ok(Self { bin_count })
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Bin a series and return display bins ordered by ascending center.
    ///
    /// # Example
    /// ```
    /// use site_kpi::services::histogram::HistogramBinner;
    ///
    /// let binner = HistogramBinner::new(2).unwrap();
    /// let bins = binner.bin(vec![Some(0.0), None, Some(10.0), Some(9.0)]);
    /// assert_eq!(bins.len(), 2);
    /// assert_eq!(bins[0].count, 1);
    /// assert_eq!(bins[1].count, 2);
    /// ```
    pub fn bin<I>(&self, values: I) -> Vec<HistogramBin>
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        self.histogram(values).bins()
    }

    /// Compute the raw histogram (edges and counts) of a series.
    pub fn histogram<I>(&self, values: I) -> Histogram
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        let mut dropped = 0usize;
        let finite: Vec<f64> = values
            .into_iter()
            .filter_map(|v| {
                let v = v.into().filter(|x| x.is_finite());
                if v.is_none() {
                    dropped += 1;
                }
                v
            })
            .collect();

        if dropped > 0 {
            debug!("Histogram: dropped {} absent or non-finite values", dropped);
        }

        if finite.is_empty() {
            return Histogram::empty();
        }

        let (min, max) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if min == max {
            return Histogram {
                edges: vec![min - 0.5, max + 0.5],
                counts: vec![finite.len() as u64],
            };
        }

        let n = self.bin_count;
        let step = (max - min) / n as f64;
        let edges: Vec<f64> = (0..=n)
            .map(|i| if i == n { max } else { min + i as f64 * step })
            .collect();

        let norm = n as f64 / (max - min);
        let mut counts = vec![0u64; n];
        for &value in &finite {
            counts[bin_index(value, min, norm, &edges)] += 1;
        }

        Histogram { edges, counts }
    }
}

/// Index of the interval holding `value`, correcting float error at edges.
fn bin_index(value: f64, min: f64, norm: f64, edges: &[f64]) -> usize {
    let n = edges.len() - 1;
    let mut index = (((value - min) * norm) as usize).min(n - 1);

    if index > 0 && value < edges[index] {
        index -= 1;
    }
    if index != n - 1 && value >= edges[index + 1] {
        index += 1;
    }
    index
}

/// Bin a plain slice of values.
pub fn bin_values(values: &[f64], bin_count: usize) -> KpiResult<Vec<HistogramBin>> {
    Ok(HistogramBinner::new(bin_count)?.bin(values.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_to_hundred_in_twenty_bins() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        let bins = bin_values(&values, 20).unwrap();

        assert_eq!(bins.len(), 20);
        assert!(bins.iter().all(|b| b.count == 5), "bins: {:?}", bins);
        assert_eq!(bins.first().map(|b| b.center), Some(3));
        assert_eq!(bins.last().map(|b| b.center), Some(98));
        for pair in bins.windows(2) {
            let width = pair[1].center - pair[0].center;
            assert!((4..=6).contains(&width), "width {} out of range", width);
        }
    }

    #[test]
    fn test_absent_and_non_finite_values_are_dropped() {
        let binner = HistogramBinner::new(4).unwrap();
        let hist = binner.histogram(vec![
            Some(1.0),
            None,
            Some(f64::NAN),
            Some(f64::INFINITY),
            Some(5.0),
        ]);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.counts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let binner = HistogramBinner::new(3).unwrap();
        let hist = binner.histogram(vec![0.0, 3.0]);
        assert_eq!(hist.counts, vec![1, 0, 1]);
        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_interior_edge_belongs_to_upper_bin() {
        let binner = HistogramBinner::new(2).unwrap();
        let hist = binner.histogram(vec![0.0, 5.0, 10.0]);
        assert_eq!(hist.counts, vec![1, 2]);
    }

    #[test]
    fn test_empty_input_yields_no_bins() {
        let binner = HistogramBinner::default();
        assert!(binner.bin(Vec::<Option<f64>>::new()).is_empty());
        assert!(binner.bin(vec![None, None]).is_empty());
    }

    #[test]
    fn test_identical_values_yield_single_bin() {
        let binner = HistogramBinner::default();
        let bins = binner.bin(vec![7.4, 7.4, 7.4]);
        assert_eq!(bins, vec![HistogramBin::new(7, 3)]);
    }

    #[test]
    fn test_centers_round_half_to_even() {
        let binner = HistogramBinner::new(2).unwrap();
        let bins = binner.bin(vec![0.0, 5.0]);
        // midpoints 1.25 and 3.75
        assert_eq!(bins[0].center, 1);
        assert_eq!(bins[1].center, 4);

        let bins = binner.bin(vec![0.0, 10.0]);
        // midpoints 2.5 and 7.5
        assert_eq!(bins[0].center, 2);
        assert_eq!(bins[1].center, 8);
    }

    #[test]
    fn test_negative_values() {
        let binner = HistogramBinner::new(2).unwrap();
        let bins = binner.bin(vec![-10.0, -1.0, 0.0]);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 3);
        assert_eq!(bins[0].center, -8);
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(matches!(
            HistogramBinner::new(0),
            Err(KpiError::InvalidArgument(_))
        ));
    }
}
