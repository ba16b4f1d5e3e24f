// Page payloads served to the dashboard front-end

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    DailyCount, DurationStats, HourlyCount, PlateCount, Summary, VehicleTypeCount, ViolationRecord,
};

/// Landing page: today's summary and the latest detections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub date: NaiveDate,
    pub summary: Summary,
    pub recent: Vec<ViolationRecord>,
}

/// Dashboard page for a single calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDashboard {
    pub date: NaiveDate,
    pub summary: Summary,
    pub vehicle_types: Vec<VehicleTypeCount>,
    /// Newest first.
    pub violations: Vec<ViolationRecord>,
}

/// Error text shown to clients when the store cannot be read.
pub const DATA_UNAVAILABLE: &str = "data unavailable";

/// Active violations, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBoard {
    pub fetched_at: i64,
    pub count: u64,
    pub violations: Vec<ViolationRecord>,
}

/// Frame pushed on /ws/live, tagged by `type` ("info", "board", "error").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LiveMessage {
    /// Sent once per connection before any board.
    Info { refresh_interval_ms: u64 },
    Board(LiveBoard),
    /// The store could not be read. Clients keep their last board and wait for the next refresh.
    #[serde(rename = "error")]
    Unavailable { error: String, retryable: bool },
}

impl LiveMessage {
    pub fn unavailable() -> Self {
        LiveMessage::Unavailable {
            error: DATA_UNAVAILABLE.to_string(),
            retryable: true,
        }
    }
}

/// Analytics page for an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: u64,
    /// `None` when the range holds no violations ("no data", not zero).
    pub duration: Option<DurationStats>,
    pub daily: Vec<DailyCount>,
    pub hourly: Vec<HourlyCount>,
    pub vehicle_types: Vec<VehicleTypeCount>,
    pub top_plates: Vec<PlateCount>,
}
