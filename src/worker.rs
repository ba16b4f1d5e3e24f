// Background live worker: re-reads active violations on a timer and broadcasts the board
// to /ws/live subscribers (or a retryable error frame when the store cannot be read). Each refresh is an independent read; nothing carries over between ticks.

use crate::dashboard::{self, now_ms};
use crate::models::LiveMessage;
use crate::violation_repo::ViolationRepo;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for the "no receivers" log (avoid logging every refresh when no one is on /ws/live)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Store, channel, and shutdown for the worker.
pub struct WorkerDeps {
    pub repo: Arc<ViolationRepo>,
    pub tx: broadcast::Sender<LiveMessage>,
    pub ws_live_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing config.
pub struct WorkerConfig {
    pub refresh_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "live_worker",
        refresh_interval_ms = config.refresh_interval_ms
    );
    tokio::spawn(run(deps, config).instrument(worker_span))
}

async fn run(deps: WorkerDeps, config: WorkerConfig) {
    let WorkerDeps {
        repo,
        tx,
        ws_live_connections,
        mut shutdown_rx,
    } = deps;

    let mut tick = interval(Duration::from_millis(config.refresh_interval_ms));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_log_tick = interval(Duration::from_secs(config.stats_log_interval_secs));
    stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut refreshes_total: u64 = 0;
    let mut active_violations: u64 = 0;
    let mut last_no_receivers_log: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if tx.receiver_count() == 0 {
                    let should_log = last_no_receivers_log
                        .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                    if should_log {
                        tracing::debug!(
                            operation = "refresh_live_board",
                            "No active WebSocket clients; skipping refresh"
                        );
                        last_no_receivers_log = Some(Instant::now());
                    }
                    continue;
                }

                let message = match dashboard::load_live_board(&repo, now_ms()).await {
                    Ok(board) => {
                        refreshes_total += 1;
                        active_violations = board.count;
                        LiveMessage::Board(board)
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            operation = "refresh_live_board",
                            "live board refresh failed"
                        );
                        LiveMessage::unavailable()
                    }
                };
                if tx.send(message).is_err() {
                    tracing::debug!(operation = "broadcast_live_board", "live board receivers went away");
                }
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("Live worker shutting down");
                break;
            }
            _ = stats_log_tick.tick() => {
                tracing::info!(
                    ws_live_clients = ws_live_connections.load(Ordering::Relaxed),
                    refreshes_total = refreshes_total,
                    active_violations = active_violations,
                    "app stats"
                );
            }
        }
    }
}
