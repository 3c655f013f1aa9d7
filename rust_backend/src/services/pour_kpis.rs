//! Duration and rate KPIs for pour events.
//!
//! Each pour row carries six lifecycle timestamps. Four durations are taken
//! between consecutive pairs of them, and the pour speed is the delivered
//! quantity divided by the pour duration.

use log::{debug, warn};

use crate::core::domain::{PourEvent, PourEventKpis, PourKpis, RawPourRecord};
use crate::time::{minutes_between, parse_optional_timestamp};

/// Derives per-row durations (minutes) and pour speed from pour events.
pub struct DurationKpiCalculator;

impl DurationKpiCalculator {
    /// Parse and derive KPIs for every row.
    ///
    /// No row is dropped: output row `i` corresponds to input row `i`, and a
    /// timestamp that fails to parse only blanks the KPIs that depend on it.
    pub fn compute(rows: &[RawPourRecord]) -> Vec<PourEventKpis> {
        let mut unparsed = 0usize;

        let result: Vec<PourEventKpis> = rows
            .iter()
            .map(|raw| {
                let event = Self::parse_event(raw);
                unparsed += count_unparsed(raw, &event);
                let kpis = Self::derive(&event);
                PourEventKpis { event, kpis }
            })
            .collect();

        if unparsed > 0 {
            warn!(
                "{} timestamp fields across {} pour rows could not be parsed and were treated as absent",
                unparsed,
                rows.len()
            );
        }
        debug!("Derived pour KPIs for {} rows", result.len());

        result
    }

    /// Derive KPIs for events whose timestamps are already parsed.
    pub fn compute_events(events: &[PourEvent]) -> Vec<PourEventKpis> {
        events
            .iter()
            .map(|event| PourEventKpis {
                event: event.clone(),
                kpis: Self::derive(event),
            })
            .collect()
    }

    /// Parse the six timestamp cells of a raw row independently.
    pub fn parse_event(raw: &RawPourRecord) -> PourEvent {
        PourEvent {
            batch_start_time: parse_optional_timestamp(raw.batch_start_time.as_deref()),
            batch_end_time: parse_optional_timestamp(raw.batch_end_time.as_deref()),
            departure_time: parse_optional_timestamp(raw.departure_time.as_deref()),
            arrival_time: parse_optional_timestamp(raw.arrival_time.as_deref()),
            pouring_start_time: parse_optional_timestamp(raw.pouring_start_time.as_deref()),
            pouring_finish_time: parse_optional_timestamp(raw.pouring_finish_time.as_deref()),
            quantity: raw.quantity,
        }
    }

    /// Compute the five KPIs of a single event.
    pub fn derive(event: &PourEvent) -> PourKpis {
        let pour_time_minutes = duration(event.pouring_start_time, event.pouring_finish_time);

        PourKpis {
            loading_time_minutes: duration(event.batch_start_time, event.batch_end_time),
            travel_time_minutes: duration(event.departure_time, event.arrival_time),
            wait_time_minutes: duration(event.arrival_time, event.pouring_start_time),
            pour_time_minutes,
            pour_speed: pour_speed(event.quantity, pour_time_minutes),
        }
    }
}

/// Quantity poured per minute.
///
/// Floors to `0.0` when the pour time is absent or not strictly positive.
/// This differs on purpose from the absence propagation used by durations and
/// matches what the dashboard has always reported. With a positive pour time
/// and an unknown quantity the speed is absent.
pub fn pour_speed(quantity: Option<f64>, pour_time_minutes: Option<f64>) -> Option<f64> {
    match pour_time_minutes {
        Some(minutes) if minutes > 0.0 => quantity.map(|q| q / minutes),
        _ => Some(0.0),
    }
}

fn duration(
    start: Option<chrono::NaiveDateTime>,
    end: Option<chrono::NaiveDateTime>,
) -> Option<f64> {
    Some(minutes_between(start?, end?))
}

fn count_unparsed(raw: &RawPourRecord, event: &PourEvent) -> usize {
    let pairs = [
        (&raw.batch_start_time, event.batch_start_time),
        (&raw.batch_end_time, event.batch_end_time),
        (&raw.departure_time, event.departure_time),
        (&raw.arrival_time, event.arrival_time),
        (&raw.pouring_start_time, event.pouring_start_time),
        (&raw.pouring_finish_time, event.pouring_finish_time),
    ];
    pairs
        .iter()
        .filter(|(text, parsed)| {
            parsed.is_none() && text.as_deref().is_some_and(|t| !t.trim().is_empty())
        })
        .count()
}

/// Convenience wrapper around [`DurationKpiCalculator::compute`].
pub fn compute_pour_kpis(rows: &[RawPourRecord]) -> Vec<PourEventKpis> {
    DurationKpiCalculator::compute(rows)
}
