// Page payload tests: pure builders, date range defaults, store-backed loaders

mod common;

use chrono::FixedOffset;
use common::*;
use parkwatch::aggregator::utc;
use parkwatch::config::DisplayConfig;
use parkwatch::dashboard;
use parkwatch::models::*;

#[test]
fn analytics_range_defaults() {
    let today = date(2024, 3, 10);
    assert_eq!(
        dashboard::analytics_range(None, None, today, 7),
        (date(2024, 3, 3), today)
    );
    assert_eq!(
        dashboard::analytics_range(None, Some(date(2024, 2, 1)), today, 7),
        (date(2024, 1, 25), date(2024, 2, 1))
    );
    assert_eq!(
        dashboard::analytics_range(Some(date(2024, 3, 1)), None, today, 7),
        (date(2024, 3, 1), today)
    );
}

#[test]
fn today_uses_display_offset() {
    let now = utc_ms(2024, 3, 10, 23, 30);
    assert_eq!(dashboard::today(now, utc()), date(2024, 3, 10));
    let plus_one = FixedOffset::east_opt(3600).unwrap();
    assert_eq!(dashboard::today(now, plus_one), date(2024, 3, 11));
}

#[test]
fn overview_summarizes_only_the_given_day() {
    let day = date(2024, 3, 10);
    let records = vec![
        active(1, utc_ms(2024, 3, 10, 8, 0)),
        resolved(2, utc_ms(2024, 3, 10, 9, 0)),
        active(3, utc_ms(2024, 3, 9, 9, 0)),
    ];
    let recent = vec![
        active(1, utc_ms(2024, 3, 10, 8, 0)),
        resolved(2, utc_ms(2024, 3, 10, 9, 0)),
        active(3, utc_ms(2024, 3, 9, 9, 0)),
        active(4, utc_ms(2024, 3, 8, 9, 0)),
    ];
    let page = dashboard::build_overview(day, &records, recent, 3, utc());
    assert_eq!(page.date, day);
    assert_eq!(page.summary.total, 2);
    assert_eq!(page.summary.active, 1);
    assert_eq!(
        page.recent.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![2, 1, 3]
    );
}

#[test]
fn overview_of_empty_day() {
    let page = dashboard::build_overview(date(2024, 3, 10), &[], vec![], 3, utc());
    assert_eq!(page.summary.total, 0);
    assert_eq!(page.summary.avg_duration, 0.0);
    assert!(page.recent.is_empty());
}

#[test]
fn daily_dashboard_lists_day_newest_first() {
    let day = date(2024, 3, 10);
    let records = vec![
        with_type(active(1, utc_ms(2024, 3, 10, 8, 0)), "car"),
        with_type(resolved(2, utc_ms(2024, 3, 10, 17, 0)), "truck"),
        with_type(active(3, utc_ms(2024, 3, 10, 12, 0)), "car"),
        with_type(active(4, utc_ms(2024, 3, 11, 0, 0)), "bus"),
    ];
    let page = dashboard::build_daily_dashboard(day, &records, utc());
    assert_eq!(
        page.violations.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![2, 3, 1]
    );
    assert_eq!(page.summary.total, 3);
    assert_eq!(page.summary.resolved, 1);
    assert_eq!(page.vehicle_types.len(), 2);
    assert_eq!(page.vehicle_types[0].vehicle_type, "car");
    assert_eq!(page.vehicle_types[0].count, 2);
}

#[test]
fn live_board_keeps_active_newest_first() {
    let records = vec![
        active(1, 1_000),
        resolved(2, 3_000),
        active(3, 2_000),
        record(4, None, ViolationStatus::Active),
        record(5, Some(5_000), ViolationStatus::Unknown),
    ];
    let board = dashboard::build_live_board(records, 9_999);
    assert_eq!(board.fetched_at, 9_999);
    assert_eq!(board.count, 3);
    assert_eq!(
        board.violations.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![3, 1, 4]
    );
}

#[test]
fn analytics_over_range() {
    let records = vec![
        with_plate(with_duration(active(1, utc_ms(2024, 3, 9, 10, 0)), 2.0), "AAA"),
        with_plate(with_duration(active(2, utc_ms(2024, 3, 10, 10, 30)), 4.0), "AAA"),
        with_plate(with_duration(resolved(3, utc_ms(2024, 3, 10, 18, 0)), 9.0), "BBB"),
        with_duration(active(4, utc_ms(2024, 3, 12, 10, 0)), 100.0),
    ];
    let page = dashboard::build_analytics(
        date(2024, 3, 9),
        date(2024, 3, 10),
        &records,
        utc(),
        10,
    )
    .unwrap();
    assert_eq!(page.total, 3);
    let duration = page.duration.expect("range has data");
    assert_eq!(duration.min, 2.0);
    assert_eq!(duration.max, 9.0);
    assert!((duration.average - 5.0).abs() < 1e-9);
    assert_eq!(
        page.daily,
        vec![
            DailyCount {
                date: date(2024, 3, 9),
                count: 1
            },
            DailyCount {
                date: date(2024, 3, 10),
                count: 2
            },
        ]
    );
    assert_eq!(
        page.hourly,
        vec![
            HourlyCount { hour: 10, count: 2 },
            HourlyCount { hour: 18, count: 1 },
        ]
    );
    assert_eq!(page.top_plates[0].plate_number, "AAA");
    assert_eq!(page.top_plates[0].count, 2);
}

#[test]
fn analytics_of_empty_range_has_no_duration() {
    let page =
        dashboard::build_analytics(date(2024, 3, 9), date(2024, 3, 10), &[], utc(), 10).unwrap();
    assert_eq!(page.total, 0);
    assert!(page.duration.is_none());
    assert!(page.daily.is_empty());
    assert!(page.top_plates.is_empty());

    let json = serde_json::to_value(&page).unwrap();
    assert!(json["duration"].is_null());
}

#[test]
fn analytics_rejects_inverted_range() {
    assert!(
        dashboard::build_analytics(date(2024, 3, 10), date(2024, 3, 9), &[], utc(), 10).is_err()
    );
}

#[tokio::test]
async fn loaders_read_from_store() {
    let (_dir, repo) = temp_repo().await;
    let display = DisplayConfig::default();
    let now = utc_ms(2024, 3, 10, 20, 0);

    repo.insert_violation(&new_violation(utc_ms(2024, 3, 10, 8, 0), "active"))
        .await
        .unwrap();
    let resolved_id = repo
        .insert_violation(&new_violation(utc_ms(2024, 3, 10, 9, 0), "active"))
        .await
        .unwrap();
    repo.insert_violation(&new_violation(utc_ms(2024, 3, 5, 9, 0), "resolved"))
        .await
        .unwrap();
    repo.mark_resolved(resolved_id, now).await.unwrap();

    let overview = dashboard::load_overview(&repo, &display, now).await.unwrap();
    assert_eq!(overview.date, date(2024, 3, 10));
    assert_eq!(overview.summary.total, 2);
    assert_eq!(overview.summary.active, 1);
    assert_eq!(overview.recent.len(), 3);

    let day = dashboard::load_daily_dashboard(&repo, &display, date(2024, 3, 5))
        .await
        .unwrap();
    assert_eq!(day.summary.total, 1);

    let board = dashboard::load_live_board(&repo, now).await.unwrap();
    assert_eq!(board.count, 1);

    let analytics =
        dashboard::load_analytics(&repo, &display, date(2024, 3, 3), date(2024, 3, 10))
            .await
            .unwrap();
    assert_eq!(analytics.total, 3);
    assert_eq!(analytics.top_plates[0].plate_number, "ABC-123");
    assert_eq!(analytics.top_plates[0].count, 3);
}
