// Inclusive time windows and whole-day boundaries in the display offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use super::AggregateError;

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Timestamp range `[start, end]` in UTC epoch ms, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Result<Self, AggregateError> {
        if start > end {
            return Err(AggregateError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// 00:00:00.000 through 23:59:59.999 of `date` in `offset`.
    pub fn for_day(date: NaiveDate, offset: FixedOffset) -> Self {
        let start = day_start_ms(date, offset);
        Self {
            start,
            end: start + MS_PER_DAY - 1,
        }
    }

    /// Start of `first` through the last millisecond of `last`, both in `offset`.
    pub fn for_days(
        first: NaiveDate,
        last: NaiveDate,
        offset: FixedOffset,
    ) -> Result<Self, AggregateError> {
        let start = day_start_ms(first, offset);
        let end = day_start_ms(last, offset) + MS_PER_DAY - 1;
        Self::new(start, end)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// UTC epoch ms of local midnight starting `date` in `offset`.
pub fn day_start_ms(date: NaiveDate, offset: FixedOffset) -> i64 {
    let naive_ms = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    naive_ms - i64::from(offset.local_minus_utc()) * 1000
}

/// Calendar date of `timestamp` in `offset`; `None` when out of chrono's range.
pub fn local_date(timestamp: i64, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp).map(|t| t.with_timezone(&offset).date_naive())
}
