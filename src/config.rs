use chrono::FixedOffset;
use serde::Deserialize;

use crate::aggregator::{DEFAULT_TOP_PLATES, utc};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub live: LiveConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

/// How pages bucket and trim data. Timestamps are stored in UTC; dates and hours
/// shown on the dashboard use this fixed offset, never the host's zone.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Latest detections shown on the overview page.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
    #[serde(default = "default_top_plates_limit")]
    pub top_plates_limit: usize,
    /// Length of the analytics range when the client gives no start date.
    #[serde(default = "default_analytics_days")]
    pub analytics_default_days: u32,
}

fn default_recent_limit() -> u32 {
    3
}

fn default_top_plates_limit() -> usize {
    DEFAULT_TOP_PLATES
}

fn default_analytics_days() -> u32 {
    7
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            recent_limit: default_recent_limit(),
            top_plates_limit: default_top_plates_limit(),
            analytics_default_days: default_analytics_days(),
        }
    }
}

impl DisplayConfig {
    /// Display offset; validated config always yields the configured value.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(utc)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveConfig {
    /// How often the worker re-reads active violations for /ws/live.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Max number of live boards kept in the broadcast channel (slow clients may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
    /// How often to log app stats (ws_live clients, refreshes) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_refresh_interval_ms() -> u64 {
    5000
}

fn default_broadcast_capacity() -> usize {
    16
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            broadcast_capacity: default_broadcast_capacity(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.display.utc_offset_minutes.abs() < 24 * 60,
            "display.utc_offset_minutes must be within +/-1439, got {}",
            self.display.utc_offset_minutes
        );
        anyhow::ensure!(
            self.display.recent_limit > 0,
            "display.recent_limit must be > 0, got {}",
            self.display.recent_limit
        );
        anyhow::ensure!(
            self.display.top_plates_limit > 0,
            "display.top_plates_limit must be > 0, got {}",
            self.display.top_plates_limit
        );
        anyhow::ensure!(
            self.display.analytics_default_days > 0,
            "display.analytics_default_days must be > 0, got {}",
            self.display.analytics_default_days
        );
        anyhow::ensure!(
            self.live.refresh_interval_ms > 0,
            "live.refresh_interval_ms must be > 0, got {}",
            self.live.refresh_interval_ms
        );
        anyhow::ensure!(
            self.live.broadcast_capacity > 0,
            "live.broadcast_capacity must be > 0, got {}",
            self.live.broadcast_capacity
        );
        anyhow::ensure!(
            self.live.stats_log_interval_secs > 0,
            "live.stats_log_interval_secs must be > 0, got {}",
            self.live.stats_log_interval_secs
        );
        Ok(())
    }
}
