//! Timestamp parsing and duration helpers.

pub mod timestamp;

pub use timestamp::{minutes_between, parse_optional_timestamp, parse_timestamp};
