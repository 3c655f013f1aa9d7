//! Domain models for concrete pour events and material deliveries.
//!
//! This module provides the row-level data structures that flow through the
//! KPI pipeline: raw loader rows, parsed pour events with their derived
//! durations, material line items with their variances, and histogram bins.
//!
//! Absence is always modeled with `Option`. A value that could not be parsed
//! or was never supplied is `None`, which is distinct from zero.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One pour row as delivered by the loader, before timestamp parsing.
///
/// Timestamp fields hold the raw cell text so that each one can be parsed
/// (and fail) independently of the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPourRecord {
    pub batch_start_time: Option<String>,
    pub batch_end_time: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub pouring_start_time: Option<String>,
    pub pouring_finish_time: Option<String>,
    pub quantity: Option<f64>,
}

/// One concrete-truck delivery/pour cycle with parsed timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PourEvent {
    pub batch_start_time: Option<NaiveDateTime>,
    pub batch_end_time: Option<NaiveDateTime>,
    pub departure_time: Option<NaiveDateTime>,
    pub arrival_time: Option<NaiveDateTime>,
    pub pouring_start_time: Option<NaiveDateTime>,
    pub pouring_finish_time: Option<NaiveDateTime>,
    pub quantity: Option<f64>,
}

/// Duration and rate metrics derived from a [`PourEvent`].
///
/// Every duration is `None` when either endpoint timestamp is absent.
/// `pour_speed` is the exception: it is floored to `0.0` whenever
/// `pour_time_minutes` is absent or not strictly positive, and is only
/// `None` when the pour time is positive but the quantity is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PourKpis {
    pub loading_time_minutes: Option<f64>,
    pub travel_time_minutes: Option<f64>,
    pub wait_time_minutes: Option<f64>,
    pub pour_time_minutes: Option<f64>,
    pub pour_speed: Option<f64>,
}

/// A pour event paired with the KPIs derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PourEventKpis {
    pub event: PourEvent,
    pub kpis: PourKpis,
}

/// The pour KPIs shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiKind {
    LoadingTime,
    TravelTime,
    WaitTime,
    PourTime,
    PourSpeed,
}

impl KpiKind {
    pub const ALL: [KpiKind; 5] = [
        KpiKind::LoadingTime,
        KpiKind::TravelTime,
        KpiKind::WaitTime,
        KpiKind::PourTime,
        KpiKind::PourSpeed,
    ];

    /// Display title used as the histogram axis label.
    pub fn title(&self) -> &'static str {
        match self {
            KpiKind::LoadingTime => "Total Loading Time",
            KpiKind::TravelTime => "Total Travel Time to Site",
            KpiKind::WaitTime => "Onsite Wait Time",
            KpiKind::PourTime => "Total Pour Time",
            KpiKind::PourSpeed => "Average Speed of Pour",
        }
    }

    /// Unit label appended to the panel subheader.
    ///
    /// Pour speed keeps the dashboard's historical "(minutes/quantity)" label
    /// even though the value is quantity per minute.
    pub fn unit_label(&self) -> &'static str {
        match self {
            KpiKind::PourSpeed => "(minutes/quantity)",
            _ => "(minutes)",
        }
    }

    /// Panel subheader, e.g. `"Onsite Wait Time (minutes)"`.
    pub fn subheader(&self) -> String {
        format!("{} {}", self.title(), self.unit_label())
    }

    /// Extract this KPI's value from a derived row.
    pub fn value(&self, kpis: &PourKpis) -> Option<f64> {
        match self {
            KpiKind::LoadingTime => kpis.loading_time_minutes,
            KpiKind::TravelTime => kpis.travel_time_minutes,
            KpiKind::WaitTime => kpis.wait_time_minutes,
            KpiKind::PourTime => kpis.pour_time_minutes,
            KpiKind::PourSpeed => kpis.pour_speed,
        }
    }
}

/// One material line item comparing required vs. batched quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub material: String,
    pub required_qty: Option<f64>,
    pub batched_qty: Option<f64>,
}

impl MaterialRecord {
    /// Creates a record with both quantities present.
    pub fn new(material: impl Into<String>, required_qty: f64, batched_qty: f64) -> Self {
        Self {
            material: material.into(),
            required_qty: Some(required_qty),
            batched_qty: Some(batched_qty),
        }
    }
}

/// A material record enriched with its variance metrics.
///
/// `variation_percent` is `Some(inf)` / `Some(NaN)` when `required_qty` is
/// zero. Non-finite values are kept as-is and serialized as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialVariance {
    pub material: String,
    pub required_qty: Option<f64>,
    pub batched_qty: Option<f64>,
    pub absolute_variation: Option<f64>,
    #[serde(with = "float_repr")]
    pub variation_percent: Option<f64>,
}

/// The projection of a material row used by the significant-discrepancy table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub material: String,
    pub required_qty: Option<f64>,
    pub batched_qty: Option<f64>,
    pub absolute_variation: f64,
}

/// One histogram bar: rounded bin midpoint and its frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub center: i64,
    pub count: u64,
}

impl HistogramBin {
    pub fn new(center: i64, count: u64) -> Self {
        Self { center, count }
    }
}

/// Serde adapter that keeps non-finite floats distinguishable in JSON.
///
/// `serde_json` writes `inf` and `NaN` as `null`, which would collapse them
/// into "absent". They are written as the strings `"inf"`, `"-inf"`, `"NaN"`.
pub mod float_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            None => serializer.serialize_none(),
            Some(v) if v.is_nan() => serializer.serialize_some("NaN"),
            Some(v) if v.is_infinite() && *v > 0.0 => serializer.serialize_some("inf"),
            Some(v) if v.is_infinite() => serializer.serialize_some("-inf"),
            Some(v) => serializer.serialize_some(v),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let repr = Option::<Repr>::deserialize(deserializer)?;
        match repr {
            None => Ok(None),
            Some(Repr::Number(v)) => Ok(Some(v)),
            Some(Repr::Text(s)) => match s.as_str() {
                "inf" => Ok(Some(f64::INFINITY)),
                "-inf" => Ok(Some(f64::NEG_INFINITY)),
                "NaN" => Ok(Some(f64::NAN)),
                other => Err(serde::de::Error::custom(format!(
                    "invalid float representation: {}",
                    other
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_titles_and_units() {
        assert_eq!(KpiKind::LoadingTime.subheader(), "Total Loading Time (minutes)");
        assert_eq!(
            KpiKind::PourSpeed.subheader(),
            "Average Speed of Pour (minutes/quantity)"
        );
        assert_eq!(KpiKind::PourTime.unit_label(), "(minutes)");
    }

    #[test]
    fn test_kpi_value_extraction() {
        let kpis = PourKpis {
            loading_time_minutes: Some(10.0),
            travel_time_minutes: None,
            wait_time_minutes: Some(-2.0),
            pour_time_minutes: Some(30.0),
            pour_speed: Some(0.25),
        };
        assert_eq!(KpiKind::LoadingTime.value(&kpis), Some(10.0));
        assert_eq!(KpiKind::TravelTime.value(&kpis), None);
        assert_eq!(KpiKind::WaitTime.value(&kpis), Some(-2.0));
        assert_eq!(KpiKind::PourSpeed.value(&kpis), Some(0.25));
    }

    #[test]
    fn test_material_variance_serializes_infinity_as_text() {
        let row = MaterialVariance {
            material: "cement".to_string(),
            required_qty: Some(0.0),
            batched_qty: Some(10.0),
            absolute_variation: Some(10.0),
            variation_percent: Some(f64::INFINITY),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["variation_percent"], "inf");

        let back: MaterialVariance = serde_json::from_value(json).unwrap();
        assert_eq!(back.variation_percent, Some(f64::INFINITY));
    }

    #[test]
    fn test_material_variance_absent_percent_stays_null() {
        let row = MaterialVariance {
            material: "sand".to_string(),
            required_qty: None,
            batched_qty: Some(3.0),
            absolute_variation: None,
            variation_percent: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json["variation_percent"].is_null());
    }
}
