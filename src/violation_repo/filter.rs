// Read filter for the violations table and its translation into SQL.

use sqlx::{QueryBuilder, Sqlite};

use crate::aggregator::TimeWindow;
use crate::models::ViolationStatus;

const COLUMNS: &str = "id, timestamp, vehicle_type, plate_number, color, duration, status, location, image_url, resolved_at";

/// Optional constraints for `ViolationRepo::fetch_violations`. The default fetches everything, oldest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViolationFilter {
    pub status: Option<ViolationStatus>,
    /// Inclusive on both ends; undated rows never match.
    pub window: Option<TimeWindow>,
    pub newest_first: bool,
    pub limit: Option<u32>,
}

impl ViolationFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ViolationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn within(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(super) fn to_query(self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM violations WHERE 1 = 1"));

        match self.status {
            Some(ViolationStatus::Unknown) => {
                qb.push(" AND (status IS NULL OR LOWER(TRIM(status)) NOT IN ('active', 'resolved'))");
            }
            Some(status) => {
                qb.push(" AND LOWER(TRIM(status)) = ");
                qb.push_bind(status.as_str());
            }
            None => {}
        }

        if let Some(window) = self.window {
            qb.push(" AND timestamp >= ");
            qb.push_bind(window.start());
            qb.push(" AND timestamp <= ");
            qb.push_bind(window.end());
        }

        if self.newest_first {
            qb.push(" ORDER BY timestamp DESC, id DESC");
        } else {
            qb.push(" ORDER BY timestamp ASC, id ASC");
        }

        if let Some(limit) = self.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        qb
    }
}
