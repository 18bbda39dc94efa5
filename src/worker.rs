// Background worker: the shared site probe (one per interval for all sessions) and the
// periodic app-stats log line.

use crate::hub::BroadcastHub;
use crate::orchestrator::Orchestrator;
use crate::site::SiteMonitor;
use std::sync::Arc;
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for the "no sessions" message (avoid logging every tick when nobody is connected)
const NO_SESSIONS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state and shutdown for the worker.
pub struct WorkerDeps {
    pub site: Arc<SiteMonitor>,
    pub hub: Arc<BroadcastHub>,
    pub orchestrator: Arc<Orchestrator>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing config.
pub struct WorkerConfig {
    pub probe_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        site,
        hub,
        orchestrator,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        probe_interval_ms,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", probe_interval_ms);
    let task = async move {
        let mut probe_tick = interval(Duration::from_millis(probe_interval_ms));
        probe_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last_no_sessions_log: Option<Instant> = None;

        'worker: loop {
            tokio::select! {
                _ = probe_tick.tick() => {
                    // Nobody is watching: sessions probe on demand when they connect.
                    if hub.session_count() == 0 {
                        let should_log = last_no_sessions_log
                            .is_none_or(|t| t.elapsed() >= NO_SESSIONS_LOG_INTERVAL);
                        if should_log {
                            tracing::debug!(
                                operation = "probe_site",
                                "No connected sessions; skipping shared site probe"
                            );
                            last_no_sessions_log = Some(Instant::now());
                        }
                        continue;
                    }
                    // Shutdown preempts an in-flight probe.
                    let verdict = tokio::select! {
                        verdict = site.refresh() => verdict,
                        _ = &mut shutdown_rx => {
                            tracing::debug!("Worker shutting down, site probe abandoned");
                            break 'worker;
                        }
                    };
                    tracing::debug!(
                        operation = "probe_site",
                        status = ?verdict.status,
                        status_code = ?verdict.http_status_code,
                        https = verdict.https_active,
                        "site probed"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break 'worker;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        sessions = hub.session_count(),
                        buckets_appended_total = orchestrator.buckets_appended_total(),
                        site_probes_total = site.probes_total(),
                        "app stats"
                    );
                }
            }
        }
    };
    tokio::spawn(task.instrument(worker_span))
}
