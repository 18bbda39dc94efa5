// Per-session polling: two independent timers, one for the workload list and one for
// the host sample + site verdict. Owned by ClientSession; aborted on disconnect.

use crate::hub::SessionId;
use crate::models::{ServerEvent, SiteVerdict, SystemSample, WorkloadSummary, unix_millis};
use crate::orchestrator::Orchestrator;
use crate::site::SiteMonitor;
use crate::sources::{HostMetricsSource, WorkloadLister};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::Instrument;

/// Everything a session's poller reads from.
#[derive(Clone)]
pub struct PollerDeps {
    pub host: Arc<dyn HostMetricsSource>,
    pub workloads: Arc<dyn WorkloadLister>,
    pub site: Arc<SiteMonitor>,
    pub orchestrator: Arc<Orchestrator>,
    pub interval: Duration,
}

pub struct ClientSession {
    workloads_task: JoinHandle<()>,
    stats_task: JoinHandle<()>,
}

impl ClientSession {
    /// Start both cycles. The first tick of each is one interval from now; the
    /// immediate sample is sent by the hub on connect.
    pub fn spawn(id: SessionId, deps: PollerDeps, outbound: mpsc::Sender<ServerEvent>) -> Self {
        let span = tracing::info_span!("session", session_id = id);
        let workloads_task = tokio::spawn(
            run_workloads_cycle(id, deps.clone(), outbound.clone()).instrument(span.clone()),
        );
        let stats_task = tokio::spawn(run_stats_cycle(id, deps, outbound).instrument(span));
        Self {
            workloads_task,
            stats_task,
        }
    }

    /// Abort both cycles. Any fetch in flight is dropped with its task.
    pub fn cancel(&self) {
        self.workloads_task.abort();
        self.stats_task.abort();
    }

    /// Both cycles have stopped (cancelled, or their session receiver is gone).
    pub fn is_finished(&self) -> bool {
        self.workloads_task.is_finished() && self.stats_task.is_finished()
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Workload list, or an empty list if the runtime is unavailable.
pub async fn fetch_containers(deps: &PollerDeps) -> Vec<WorkloadSummary> {
    deps.workloads.list().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation = "list_workloads", "workload list failed");
        Vec::new()
    })
}

/// Host sample, zeroed if the metrics source fails.
pub async fn fetch_sample(deps: &PollerDeps) -> SystemSample {
    deps.host.sample().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, operation = "sample_host", "host metrics failed");
        SystemSample::unavailable(unix_millis())
    })
}

/// Host sample and the shared site verdict, fetched concurrently.
pub async fn fetch_system_stats(deps: &PollerDeps) -> (SystemSample, SiteVerdict) {
    tokio::join!(fetch_sample(deps), deps.site.latest())
}

fn cycle_interval(period: Duration) -> tokio::time::Interval {
    let mut tick = interval_at(Instant::now() + period, period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tick
}

/// Queue an event for the session. `false` once the session's receiver is gone.
fn deliver(id: SessionId, outbound: &mpsc::Sender<ServerEvent>, event: ServerEvent) -> bool {
    match outbound.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::debug!(session_id = id, event = event.name(), "session outbound full; dropping event");
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

async fn run_workloads_cycle(id: SessionId, deps: PollerDeps, outbound: mpsc::Sender<ServerEvent>) {
    let mut tick = cycle_interval(deps.interval);
    loop {
        tick.tick().await;
        let containers = fetch_containers(&deps).await;
        if !deliver(id, &outbound, ServerEvent::Containers(containers)) {
            break;
        }
    }
    tracing::debug!("workload cycle stopped");
}

async fn run_stats_cycle(id: SessionId, deps: PollerDeps, outbound: mpsc::Sender<ServerEvent>) {
    let mut tick = cycle_interval(deps.interval);
    loop {
        tick.tick().await;
        let (sample, verdict) = fetch_system_stats(&deps).await;
        if !deliver(
            id,
            &outbound,
            ServerEvent::system_stats(sample.clone(), verdict.clone()),
        ) {
            break;
        }
        deps.orchestrator.record(&sample, &verdict).await;
    }
    tracing::debug!("stats cycle stopped");
}
