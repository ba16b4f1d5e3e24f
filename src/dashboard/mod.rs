// Page payloads: one presentation layer over the aggregator.
// `build_*` functions are pure and re-apply the page window to whatever records they are
// given; `load_*` functions read from the store and hand the records to the builders.

use chrono::{Days, FixedOffset, NaiveDate};
use tracing::instrument;

use crate::aggregator::{self, AggregateError, TimeWindow};
use crate::config::DisplayConfig;
use crate::models::{
    Analytics, DailyDashboard, LiveBoard, Overview, ViolationRecord, ViolationStatus,
};
use crate::violation_repo::{ViolationFilter, ViolationRepo};

/// Current time in UTC epoch ms.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Calendar date of `now_ms` in `offset`.
pub fn today(now_ms: i64, offset: FixedOffset) -> NaiveDate {
    aggregator::local_date(now_ms, offset).unwrap_or_default()
}

/// Inclusive analytics range. Missing `end` is today; missing `start` is `default_days` before `end`.
pub fn analytics_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
    default_days: u32,
) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or(today);
    let start = start.unwrap_or_else(|| {
        end.checked_sub_days(Days::new(u64::from(default_days)))
            .unwrap_or(end)
    });
    (start, end)
}

pub fn build_overview(
    date: NaiveDate,
    records: &[ViolationRecord],
    mut recent: Vec<ViolationRecord>,
    recent_limit: usize,
    offset: FixedOffset,
) -> Overview {
    let todays = aggregator::time_window(records, TimeWindow::for_day(date, offset));
    sort_newest_first(&mut recent);
    recent.truncate(recent_limit);
    Overview {
        date,
        summary: aggregator::summary(&todays),
        recent,
    }
}

pub fn build_daily_dashboard(
    date: NaiveDate,
    records: &[ViolationRecord],
    offset: FixedOffset,
) -> DailyDashboard {
    let mut violations = aggregator::time_window(records, TimeWindow::for_day(date, offset));
    sort_newest_first(&mut violations);
    DailyDashboard {
        date,
        summary: aggregator::summary(&violations),
        vehicle_types: aggregator::count_by_vehicle_type(&violations),
        violations,
    }
}

pub fn build_live_board(records: Vec<ViolationRecord>, fetched_at: i64) -> LiveBoard {
    let mut violations: Vec<ViolationRecord> =
        records.into_iter().filter(|r| r.is_active()).collect();
    sort_newest_first(&mut violations);
    LiveBoard {
        fetched_at,
        count: violations.len() as u64,
        violations,
    }
}

pub fn build_analytics(
    start: NaiveDate,
    end: NaiveDate,
    records: &[ViolationRecord],
    offset: FixedOffset,
    top_plates_limit: usize,
) -> Result<Analytics, AggregateError> {
    let window = TimeWindow::for_days(start, end, offset)?;
    let in_range = aggregator::time_window(records, window);

    let duration = match aggregator::duration_stats(&in_range) {
        Ok(stats) => Some(stats),
        Err(AggregateError::EmptyInput) => None,
        Err(e) => return Err(e),
    };

    Ok(Analytics {
        start,
        end,
        total: in_range.len() as u64,
        duration,
        daily: aggregator::daily_trend(&in_range, offset),
        hourly: aggregator::hourly_trend(&in_range, offset),
        vehicle_types: aggregator::count_by_vehicle_type(&in_range),
        top_plates: aggregator::top_plates(&in_range, top_plates_limit),
    })
}

#[instrument(skip(repo, display), fields(page = "overview"))]
pub async fn load_overview(
    repo: &ViolationRepo,
    display: &DisplayConfig,
    now_ms: i64,
) -> anyhow::Result<Overview> {
    let offset = display.offset();
    let date = today(now_ms, offset);
    let todays = repo
        .fetch_violations(&ViolationFilter::all().within(TimeWindow::for_day(date, offset)))
        .await?;
    let recent = repo
        .fetch_violations(
            &ViolationFilter::all()
                .newest_first()
                .limit(display.recent_limit),
        )
        .await?;
    Ok(build_overview(
        date,
        &todays,
        recent,
        display.recent_limit as usize,
        offset,
    ))
}

#[instrument(skip(repo, display), fields(page = "dashboard"))]
pub async fn load_daily_dashboard(
    repo: &ViolationRepo,
    display: &DisplayConfig,
    date: NaiveDate,
) -> anyhow::Result<DailyDashboard> {
    let offset = display.offset();
    let records = repo
        .fetch_violations(
            &ViolationFilter::all()
                .within(TimeWindow::for_day(date, offset))
                .newest_first(),
        )
        .await?;
    Ok(build_daily_dashboard(date, &records, offset))
}

#[instrument(skip(repo), fields(page = "live"))]
pub async fn load_live_board(repo: &ViolationRepo, now_ms: i64) -> anyhow::Result<LiveBoard> {
    let records = repo
        .fetch_violations(
            &ViolationFilter::all()
                .with_status(ViolationStatus::Active)
                .newest_first(),
        )
        .await?;
    Ok(build_live_board(records, now_ms))
}

#[instrument(skip(repo, display), fields(page = "analytics"))]
pub async fn load_analytics(
    repo: &ViolationRepo,
    display: &DisplayConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Analytics> {
    let offset = display.offset();
    let window = TimeWindow::for_days(start, end, offset)?;
    let records = repo
        .fetch_violations(&ViolationFilter::all().within(window))
        .await?;
    Ok(build_analytics(
        start,
        end,
        &records,
        offset,
        display.top_plates_limit,
    )?)
}

/// Newest first; undated records go last.
fn sort_newest_first(records: &mut [ViolationRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
