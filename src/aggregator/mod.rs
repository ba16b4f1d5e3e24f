// Pure aggregation over violation records.
// No I/O and no store access: callers hand in an already-fetched slice and get fresh values back.

mod window;

pub use window::{MS_PER_DAY, TimeWindow, day_start_ms, local_date};

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};

use crate::models::{
    DailyCount, DurationStats, HourlyCount, PlateCount, Summary, VehicleTypeCount,
    ViolationRecord, ViolationStatus, normalize_vehicle_type,
};

/// Number of plates returned by `top_plates` when the caller has no preference.
pub const DEFAULT_TOP_PLATES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("no violations to aggregate")]
    EmptyInput,
    #[error("violation {id} has no usable timestamp")]
    MalformedRecord { id: i64 },
    #[error("window start {start} is after end {end}")]
    InvalidWindow { start: i64, end: i64 },
}

/// Status counts and mean duration. Total for every input, including the empty slice.
pub fn summary(records: &[ViolationRecord]) -> Summary {
    let total = records.len() as u64;
    if total == 0 {
        return Summary {
            total: 0,
            active: 0,
            resolved: 0,
            unknown: 0,
            avg_duration: 0.0,
        };
    }

    let active = count_status(records, ViolationStatus::Active);
    let unknown = count_status(records, ViolationStatus::Unknown);
    let duration_sum: f64 = records.iter().map(|r| r.duration).sum();

    Summary {
        total,
        active,
        resolved: total - active,
        unknown,
        avg_duration: duration_sum / total as f64,
    }
}

/// Violations per vehicle type, in order of first occurrence.
pub fn count_by_vehicle_type(records: &[ViolationRecord]) -> Vec<VehicleTypeCount> {
    count_first_seen(
        records
            .iter()
            .map(|r| normalize_vehicle_type(Some(&r.vehicle_type))),
    )
    .into_iter()
    .map(|(vehicle_type, count)| VehicleTypeCount {
        vehicle_type,
        count,
    })
    .collect()
}

/// Average, max and min duration. Empty input has no such statistics.
pub fn duration_stats(records: &[ViolationRecord]) -> Result<DurationStats, AggregateError> {
    let Some(first) = records.first() else {
        return Err(AggregateError::EmptyInput);
    };

    let mut min = first.duration;
    let mut max = first.duration;
    let mut sum = 0.0;
    for r in records {
        min = min.min(r.duration);
        max = max.max(r.duration);
        sum += r.duration;
    }

    Ok(DurationStats {
        average: sum / records.len() as f64,
        max,
        min,
    })
}

/// Violations per calendar date in `offset`, ascending. Undated records are skipped.
pub fn daily_trend(records: &[ViolationRecord], offset: FixedOffset) -> Vec<DailyCount> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for r in records {
        let Ok(at) = local_time(r, offset) else {
            continue;
        };
        *by_date.entry(at.date_naive()).or_default() += 1;
    }
    by_date
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Violations per hour of day in `offset`, ascending. Undated records are skipped.
pub fn hourly_trend(records: &[ViolationRecord], offset: FixedOffset) -> Vec<HourlyCount> {
    let mut by_hour: BTreeMap<u32, u64> = BTreeMap::new();
    for r in records {
        let Ok(at) = local_time(r, offset) else {
            continue;
        };
        *by_hour.entry(at.hour()).or_default() += 1;
    }
    by_hour
        .into_iter()
        .map(|(hour, count)| HourlyCount { hour, count })
        .collect()
}

/// Most frequent plates, descending by count; ties keep first-seen order.
/// Records without a plate are not ranked.
pub fn top_plates(records: &[ViolationRecord], limit: usize) -> Vec<PlateCount> {
    let mut counts = count_first_seen(records.iter().filter_map(|r| r.plate_number.clone()));
    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
        .into_iter()
        .map(|(plate_number, count)| PlateCount {
            plate_number,
            count,
        })
        .collect()
}

/// Records with `window.start() <= timestamp <= window.end()`. Undated records are excluded.
pub fn time_window(records: &[ViolationRecord], window: TimeWindow) -> Vec<ViolationRecord> {
    records
        .iter()
        .filter(|r| r.timestamp.is_some_and(|t| window.contains(t)))
        .cloned()
        .collect()
}

/// Record timestamp in `offset`.
pub fn local_time(
    record: &ViolationRecord,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, AggregateError> {
    record
        .timestamp
        .and_then(DateTime::from_timestamp_millis)
        .map(|t| t.with_timezone(&offset))
        .ok_or(AggregateError::MalformedRecord { id: record.id })
}

/// UTC as a fixed offset.
pub fn utc() -> FixedOffset {
    Utc.fix()
}

fn count_status(records: &[ViolationRecord], status: ViolationStatus) -> u64 {
    records.iter().filter(|r| r.status == status).count() as u64
}

/// Occurrence counts keyed by string, in order of first occurrence.
fn count_first_seen(keys: impl Iterator<Item = String>) -> Vec<(String, u64)> {
    let mut out: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for key in keys {
        match index.get(&key) {
            Some(&i) => out[i].1 += 1,
            None => {
                index.insert(key.clone(), out.len());
                out.push((key, 1));
            }
        }
    }
    out
}
