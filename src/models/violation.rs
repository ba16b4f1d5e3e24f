// Violation record as read from the store, plus the insert shape used by seeding tools.

use serde::{Deserialize, Serialize};

/// Vehicle type used when the store has none (or an empty string).
pub const UNKNOWN_VEHICLE_TYPE: &str = "unknown";

/// Violation status; serializes to lowercase JSON (e.g. "active").
/// Anything the store holds other than the two known values is `Unknown`, never `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationStatus {
    Active,
    Resolved,
    #[serde(other)]
    Unknown,
}

impl ViolationStatus {
    /// Parse the raw store value (e.g. "active", " Resolved "). NULL maps to `Unknown`.
    pub fn from_store(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("active") => ViolationStatus::Active,
            Some("resolved") => ViolationStatus::Resolved,
            _ => ViolationStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationStatus::Active => "active",
            ViolationStatus::Resolved => "resolved",
            ViolationStatus::Unknown => "unknown",
        }
    }
}

/// One detected violation. Timestamps are UTC epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    pub id: i64,
    /// When the violation began. `None` means the record cannot be dated.
    pub timestamp: Option<i64>,
    pub vehicle_type: String,
    pub plate_number: Option<String>,
    pub color: Option<String>,
    /// Elapsed minutes, always >= 0.
    pub duration: f64,
    pub status: ViolationStatus,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub resolved_at: Option<i64>,
}

impl ViolationRecord {
    pub fn is_active(&self) -> bool {
        self.status == ViolationStatus::Active
    }
}

/// Result of a mark-resolved request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ResolveOutcome {
    /// This call moved the violation from active to resolved.
    Resolved { resolved_at: i64 },
    /// Already resolved (or unknown status); left untouched.
    NotActive {
        status: ViolationStatus,
        resolved_at: Option<i64>,
    },
    NotFound,
}

/// Fields supplied by the detection pipeline when a violation is recorded.
/// Raw values are stored as given; normalization happens on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewViolation {
    pub timestamp: Option<i64>,
    pub vehicle_type: Option<String>,
    pub plate_number: Option<String>,
    pub color: Option<String>,
    pub duration: Option<f64>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Vehicle type with absent/blank values mapped to `"unknown"`.
pub fn normalize_vehicle_type(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN_VEHICLE_TYPE.to_string(),
    }
}

/// Duration in minutes; absent, NaN and negative values become 0.
pub fn normalize_duration(raw: Option<f64>) -> f64 {
    match raw {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => 0.0,
    }
}

/// Optional free-form text; blank strings are treated as absent.
pub fn normalize_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
