// SQLite violation store. One row per detection; columns mirror the record fields and
// are nullable because the detection pipeline may omit any of them. Normalization
// (unknown vehicle type, zero duration, unknown status) happens on read.

mod filter;

pub use filter::ViolationFilter;

use crate::models::{
    NewViolation, ResolveOutcome, ViolationRecord, ViolationStatus, normalize_duration,
    normalize_text, normalize_vehicle_type,
};
use sqlx::{Row, Sqlite};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct ViolationRepo {
    pool: SqlitePool,
}

impl ViolationRepo {
    /// Connect to SQLite at `path`, create parent dir and DB if missing, enable WAL + pragmas.
    pub async fn connect(path: &str, max_pool_size: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS violations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER,
                vehicle_type TEXT,
                plate_number TEXT,
                color TEXT,
                duration REAL,
                status TEXT,
                location TEXT,
                image_url TEXT,
                resolved_at INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_violations_timestamp ON violations(timestamp)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_violations_status ON violations(status)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Store one detection as given and return its id.
    #[instrument(skip(self, violation), fields(repo = "violations", operation = "insert_violation"))]
    pub async fn insert_violation(&self, violation: &NewViolation) -> anyhow::Result<i64> {
        let r = sqlx::query(
            "INSERT INTO violations (timestamp, vehicle_type, plate_number, color, duration, status, location, image_url) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(violation.timestamp)
        .bind(&violation.vehicle_type)
        .bind(&violation.plate_number)
        .bind(&violation.color)
        .bind(violation.duration)
        .bind(&violation.status)
        .bind(&violation.location)
        .bind(&violation.image_url)
        .execute(&self.pool)
        .await?;
        Ok(r.last_insert_rowid())
    }

    #[instrument(skip(self), fields(repo = "violations", operation = "fetch_violations"))]
    pub async fn fetch_violations(
        &self,
        filter: &ViolationFilter,
    ) -> anyhow::Result<Vec<ViolationRecord>> {
        let mut qb = filter.to_query();
        let rows = qb.build().fetch_all(&self.pool).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_violation_row(&row)?);
        }
        Ok(out)
    }

    pub async fn get_violation(&self, id: i64) -> anyhow::Result<Option<ViolationRecord>> {
        let row = sqlx::query(
            "SELECT id, timestamp, vehicle_type, plate_number, color, duration, status, location, image_url, resolved_at
             FROM violations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::parse_violation_row).transpose()
    }

    /// Move an active violation to resolved and stamp `resolved_at = now_ms`.
    /// The update only applies while the row is still active, so of two concurrent
    /// callers exactly one sees `Resolved`; the other sees `NotActive` and nothing is overwritten.
    #[instrument(skip(self), fields(repo = "violations", operation = "mark_resolved"))]
    pub async fn mark_resolved(&self, id: i64, now_ms: i64) -> anyhow::Result<ResolveOutcome> {
        let r = sqlx::query(
            "UPDATE violations SET status = 'resolved', resolved_at = $1 WHERE id = $2 AND LOWER(TRIM(status)) = 'active'",
        )
        .bind(now_ms)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if r.rows_affected() > 0 {
            tracing::info!(violation_id = id, "violation resolved");
            return Ok(ResolveOutcome::Resolved {
                resolved_at: now_ms,
            });
        }

        let outcome = match self.get_violation(id).await? {
            Some(current) => ResolveOutcome::NotActive {
                status: current.status,
                resolved_at: current.resolved_at,
            },
            None => ResolveOutcome::NotFound,
        };
        tracing::debug!(violation_id = id, ?outcome, "resolve skipped");
        Ok(outcome)
    }

    /// Only `id` must decode. Any other column holding a value of the wrong storage
    /// class (SQLite does not enforce declared types) is read as absent.
    fn parse_violation_row(row: &SqliteRow) -> anyhow::Result<ViolationRecord> {
        let id: i64 = row.try_get("id")?;
        let timestamp: Option<i64> = lenient_column(row, "timestamp", id);
        let vehicle_type: Option<String> = lenient_column(row, "vehicle_type", id);
        let plate_number: Option<String> = lenient_column(row, "plate_number", id);
        let color: Option<String> = lenient_column(row, "color", id);
        let duration: Option<f64> = lenient_column(row, "duration", id);
        let status: Option<String> = lenient_column(row, "status", id);
        let location: Option<String> = lenient_column(row, "location", id);
        let image_url: Option<String> = lenient_column(row, "image_url", id);
        let resolved_at: Option<i64> = lenient_column(row, "resolved_at", id);

        let status = ViolationStatus::from_store(status.as_deref());
        if status == ViolationStatus::Unknown {
            tracing::debug!(violation_id = id, "unrecognised status, counted as unknown");
        }

        Ok(ViolationRecord {
            id,
            timestamp,
            vehicle_type: normalize_vehicle_type(vehicle_type.as_deref()),
            plate_number: normalize_text(plate_number),
            color: normalize_text(color),
            duration: normalize_duration(duration),
            status,
            location: normalize_text(location),
            image_url: normalize_text(image_url),
            resolved_at,
        })
    }
}

fn lenient_column<'r, T>(row: &'r SqliteRow, column: &'static str, id: i64) -> Option<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    match row.try_get::<Option<T>, _>(column) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(
                violation_id = id,
                column,
                error = %e,
                "undecodable column value, treated as absent"
            );
            None
        }
    }
}
