// Shared test helpers
#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use parkwatch::models::*;
use parkwatch::violation_repo::ViolationRepo;
use tempfile::TempDir;

/// UTC epoch ms for a wall-clock time in UTC.
pub fn utc_ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .timestamp_millis()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(id: i64, timestamp: Option<i64>, status: ViolationStatus) -> ViolationRecord {
    ViolationRecord {
        id,
        timestamp,
        vehicle_type: "car".into(),
        plate_number: None,
        color: None,
        duration: 0.0,
        status,
        location: None,
        image_url: None,
        resolved_at: None,
    }
}

pub fn active(id: i64, timestamp: i64) -> ViolationRecord {
    record(id, Some(timestamp), ViolationStatus::Active)
}

pub fn resolved(id: i64, timestamp: i64) -> ViolationRecord {
    record(id, Some(timestamp), ViolationStatus::Resolved)
}

pub fn with_plate(mut r: ViolationRecord, plate: &str) -> ViolationRecord {
    r.plate_number = Some(plate.into());
    r
}

pub fn with_type(mut r: ViolationRecord, vehicle_type: &str) -> ViolationRecord {
    r.vehicle_type = vehicle_type.into();
    r
}

pub fn with_duration(mut r: ViolationRecord, duration: f64) -> ViolationRecord {
    r.duration = duration;
    r
}

pub fn new_violation(timestamp: i64, status: &str) -> NewViolation {
    NewViolation {
        timestamp: Some(timestamp),
        vehicle_type: Some("car".into()),
        plate_number: Some("ABC-123".into()),
        color: Some("red".into()),
        duration: Some(5.0),
        status: Some(status.into()),
        location: Some("Gate A".into()),
        image_url: None,
    }
}

/// Fresh initialized repo in a temp dir. Keep the `TempDir` alive for the test's duration.
pub async fn temp_repo() -> (TempDir, ViolationRepo) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("violations.db");
    let repo = ViolationRepo::connect(db_path.to_str().unwrap(), 4)
        .await
        .unwrap();
    repo.init().await.unwrap();
    (dir, repo)
}

/// Run SQL directly against the repo's database file, bypassing `ViolationRepo`.
pub async fn raw_execute(dir: &TempDir, sql: &str) {
    let db_path = dir.path().join("violations.db");
    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}", db_path.to_str().unwrap()))
        .await
        .unwrap();
    sqlx::query(sql).execute(&pool).await.unwrap();
    pool.close().await;
}
