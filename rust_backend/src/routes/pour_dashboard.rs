use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisSettings;
use crate::core::domain::{HistogramBin, KpiKind, PourEventKpis, RawPourRecord};
use crate::error::KpiResult;
use crate::services::pour_kpis::DurationKpiCalculator;
use crate::services::statistics::{pour_kpi_stats, KpiStatsRow};

// =========================================================
// Pour dashboard types + route
// =========================================================

/// KPIs charted on the dashboard, two panels per row.
///
/// Total pour time is derived and appears in the statistics table but has no
/// chart of its own.
pub const DASHBOARD_LAYOUT: [[KpiKind; 2]; 2] = [
    [KpiKind::LoadingTime, KpiKind::TravelTime],
    [KpiKind::WaitTime, KpiKind::PourSpeed],
];

/// One histogram chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiPanel {
    pub kpi: KpiKind,
    pub title: String,
    pub subheader: String,
    pub bins: Vec<HistogramBin>,
    /// Number of values that made it into the histogram.
    pub binned: u64,
}

/// Complete pour dashboard dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PourDashboard {
    pub row_count: usize,
    pub panels: Vec<[KpiPanel; 2]>,
    pub stats: Vec<KpiStatsRow>,
}

/// Route name constant for the pour dashboard
pub const GET_POUR_DASHBOARD: &str = "get_pour_dashboard";

/// Derive KPIs from raw pour rows and lay them out as dashboard panels.
pub fn build_pour_dashboard(
    rows: &[RawPourRecord],
    settings: &AnalysisSettings,
) -> KpiResult<PourDashboard> {
    let derived = DurationKpiCalculator::compute(rows);
    pour_dashboard_from_kpis(&derived, settings)
}

/// Lay out already-derived pour KPIs as dashboard panels.
pub fn pour_dashboard_from_kpis(
    rows: &[PourEventKpis],
    settings: &AnalysisSettings,
) -> KpiResult<PourDashboard> {
    let binner = settings.binner()?;

    let panel = |kind: KpiKind| {
        let histogram = binner.histogram(rows.iter().map(|r| kind.value(&r.kpis)));
        KpiPanel {
            kpi: kind,
            title: kind.title().to_string(),
            subheader: kind.subheader(),
            bins: histogram.bins(),
            binned: histogram.total(),
        }
    };

    let panels: Vec<[KpiPanel; 2]> = DASHBOARD_LAYOUT
        .iter()
        .map(|[left, right]| [panel(*left), panel(*right)])
        .collect();

    debug!(
        "Built pour dashboard: {} rows, {} panel rows, {} bins per chart",
        rows.len(),
        panels.len(),
        binner.bin_count()
    );

    Ok(PourDashboard {
        row_count: rows.len(),
        panels,
        stats: pour_kpi_stats(rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start: &str, end: &str, quantity: Option<f64>) -> RawPourRecord {
        RawPourRecord {
            batch_start_time: Some(start.to_string()),
            batch_end_time: Some(end.to_string()),
            quantity,
            ..Default::default()
        }
    }

    #[test]
    fn test_dashboard_layout() {
        let rows = vec![
            raw("2023-01-01T00:00:00", "2023-01-01T00:10:00", Some(5.0)),
            raw("2023-01-01T01:00:00", "2023-01-01T01:20:00", Some(6.0)),
        ];

        let dashboard = build_pour_dashboard(&rows, &AnalysisSettings::default()).unwrap();
        assert_eq!(dashboard.row_count, 2);
        assert_eq!(dashboard.panels.len(), 2);
        assert_eq!(dashboard.panels[0][0].title, "Total Loading Time");
        assert_eq!(dashboard.panels[0][0].subheader, "Total Loading Time (minutes)");
        assert_eq!(dashboard.panels[0][1].title, "Total Travel Time to Site");
        assert_eq!(dashboard.panels[1][0].subheader, "Onsite Wait Time (minutes)");
        assert_eq!(
            dashboard.panels[1][1].subheader,
            "Average Speed of Pour (minutes/quantity)"
        );
        assert_eq!(dashboard.stats.len(), 5);
    }

    #[test]
    fn test_panels_bin_present_values_only() {
        let rows = vec![
            raw("2023-01-01T00:00:00", "2023-01-01T00:10:00", None),
            raw("2023-01-01T01:00:00", "2023-01-01T01:30:00", None),
        ];

        let dashboard = build_pour_dashboard(&rows, &AnalysisSettings::default()).unwrap();

        let loading = &dashboard.panels[0][0];
        assert_eq!(loading.binned, 2);
        assert_eq!(loading.bins.len(), 20);
        assert_eq!(loading.bins.first().map(|b| b.count), Some(1));
        assert_eq!(loading.bins.last().map(|b| b.count), Some(1));

        // No travel endpoints at all
        let travel = &dashboard.panels[0][1];
        assert_eq!(travel.binned, 0);
        assert!(travel.bins.is_empty());

        // Pour speed is floored to zero for every row
        let speed = &dashboard.panels[1][1];
        assert_eq!(speed.binned, 2);
        assert_eq!(speed.bins.len(), 1);
        assert_eq!(speed.bins[0].center, 0);
    }

    #[test]
    fn test_custom_bin_count() {
        let rows = vec![
            raw("2023-01-01T00:00:00", "2023-01-01T00:10:00", None),
            raw("2023-01-01T01:00:00", "2023-01-01T01:30:00", None),
        ];
        let settings = AnalysisSettings {
            histogram_bins: 4,
            ..Default::default()
        };

        let dashboard = build_pour_dashboard(&rows, &settings).unwrap();
        assert_eq!(dashboard.panels[0][0].bins.len(), 4);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = AnalysisSettings {
            histogram_bins: 0,
            ..Default::default()
        };
        assert!(build_pour_dashboard(&[], &settings).is_err());
    }

    #[test]
    fn test_empty_dataset() {
        let dashboard = build_pour_dashboard(&[], &AnalysisSettings::default()).unwrap();
        assert_eq!(dashboard.row_count, 0);
        assert!(dashboard
            .panels
            .iter()
            .flatten()
            .all(|p| p.bins.is_empty()));
    }
}
