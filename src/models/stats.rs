// Derived statistics produced by the aggregator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status counts and mean duration for a set of violations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: u64,
    pub active: u64,
    /// Everything not active (`total - active`), unknown statuses included.
    pub resolved: u64,
    /// How many of `resolved` carried an unrecognised status.
    pub unknown: u64,
    /// Mean duration in minutes; 0 when there are no violations.
    pub avg_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTypeCount {
    pub vehicle_type: String,
    pub count: u64,
}

/// Duration statistics in minutes. Only exists for non-empty input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyCount {
    /// Hour of day, 0..=23, in the display offset.
    pub hour: u32,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateCount {
    pub plate_number: String,
    pub count: u64,
}
