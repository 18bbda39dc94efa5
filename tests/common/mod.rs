// Shared test helpers: scripted collaborators and a wired-up hub/orchestrator.
#![allow(dead_code)]

use async_trait::async_trait;
use homedash::history_repo::HistoryRepo;
use homedash::hub::BroadcastHub;
use homedash::models::*;
use homedash::orchestrator::Orchestrator;
use homedash::probe::{HeadProbe, HeadResponse, ReachabilityProber};
use homedash::session::PollerDeps;
use homedash::site::{ProbeTimeouts, SiteClassifier, SiteMonitor};
use homedash::sources::{HostMetricsSource, WorkloadLister};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

pub const MINUTE_MS: u64 = 60 * 1000;
pub const HOUR_MS: u64 = 60 * MINUTE_MS;

/// Id the fake workload runtime does not know.
pub const UNKNOWN_WORKLOAD: &str = "gone";

pub fn sample(timestamp: u64) -> SystemSample {
    SystemSample {
        timestamp,
        uptime_seconds: 3600,
        hostname: "box".into(),
        platform: "linux".into(),
        cpu_count: 4,
        total_memory_bytes: 8 * 1024,
        free_memory_bytes: 2 * 1024,
        load_average: [1.0, 0.5, 0.25],
    }
}

pub fn up_verdict() -> SiteVerdict {
    SiteVerdict {
        status: SiteStatus::Up,
        http_status_code: Some(200),
        https_active: true,
        note: None,
    }
}

pub fn workload(name: &str) -> WorkloadSummary {
    WorkloadSummary {
        id: "0123456789ab".into(),
        name: name.into(),
        image: "nginx:latest".into(),
        state: ContainerState::Running,
        status_text: "Up 2 hours".into(),
        created_at: 1_700_000_000,
        ports: vec![],
    }
}

pub fn http_response(status_code: Option<u16>, security_headers: bool) -> HeadProbe {
    HeadProbe::Response(HeadResponse {
        status_code,
        security_headers,
    })
}

#[derive(Default)]
pub struct FakeHost {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeHost {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostMetricsSource for FakeHost {
    async fn sample(&self) -> anyhow::Result<SystemSample> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(!self.fail, "host metrics unavailable");
        Ok(sample(unix_millis()))
    }
}

#[derive(Default)]
pub struct FakeWorkloads {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeWorkloads {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkloadLister for FakeWorkloads {
    async fn list(&self) -> anyhow::Result<Vec<WorkloadSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(!self.fail, "docker unavailable");
        Ok(vec![workload("web")])
    }

    async fn logs(&self, id: &str, tail: usize) -> anyhow::Result<String> {
        anyhow::ensure!(!self.fail, "no such container: {}", id);
        Ok(format!("{} lines of {}\n", tail, id))
    }

    async fn stats(&self, id: &str) -> anyhow::Result<Option<WorkloadStats>> {
        anyhow::ensure!(!self.fail, "docker unavailable");
        if id == UNKNOWN_WORKLOAD {
            return Ok(None);
        }
        Ok(Some(WorkloadStats {
            id: id.to_string(),
            cpu_percent: 12.5,
            online_cpus: 2,
            memory_usage_bytes: 256,
            memory_limit_bytes: 1024,
            memory_percent: 25.0,
            network_rx_bytes: 10,
            network_tx_bytes: 20,
            pids: 3,
        }))
    }
}

/// Scripted prober. `head_delay` makes the HEAD stage hang for that long.
pub struct FakeProber {
    pub head: HeadProbe,
    pub ping_ok: bool,
    pub head_delay: Option<Duration>,
    pub head_calls: AtomicUsize,
    pub ping_calls: AtomicUsize,
}

impl FakeProber {
    pub fn new(head: HeadProbe, ping_ok: bool) -> Self {
        Self {
            head,
            ping_ok,
            head_delay: None,
            head_calls: AtomicUsize::new(0),
            ping_calls: AtomicUsize::new(0),
        }
    }

    pub fn hanging(ping_ok: bool) -> Self {
        Self {
            head_delay: Some(Duration::from_secs(3600)),
            ..Self::new(http_response(Some(200), true), ping_ok)
        }
    }

    pub fn calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst) + self.ping_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReachabilityProber for FakeProber {
    async fn http_head(&self) -> HeadProbe {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.head_delay {
            tokio::time::sleep(delay).await;
        }
        self.head.clone()
    }

    async fn ping(&self) -> bool {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        self.ping_ok
    }
}

pub fn timeouts() -> ProbeTimeouts {
    ProbeTimeouts {
        head: Duration::from_secs(10),
        ping: Duration::from_secs(5),
    }
}

pub fn classifier(prober: Arc<FakeProber>) -> SiteClassifier {
    SiteClassifier::new(prober, timeouts())
}

/// Everything a session needs, backed by fakes and a temp history dir.
pub struct Harness {
    pub deps: PollerDeps,
    pub hub: Arc<BroadcastHub>,
    pub history: Arc<HistoryRepo>,
    pub orchestrator: Arc<Orchestrator>,
    pub host: Arc<FakeHost>,
    pub workloads: Arc<FakeWorkloads>,
    pub prober: Arc<FakeProber>,
}

pub async fn open_history(dir: &TempDir) -> HistoryRepo {
    HistoryRepo::open(
        dir.path().join("system.json"),
        dir.path().join("site.json"),
        1000,
    )
    .await
}

pub async fn harness_with(
    dir: &TempDir,
    interval: Duration,
    host: FakeHost,
    workloads: FakeWorkloads,
) -> Harness {
    let history = Arc::new(open_history(dir).await);
    let hub = Arc::new(BroadcastHub::new(16));
    let orchestrator = Arc::new(Orchestrator::new(
        history.clone(),
        hub.clone(),
        Duration::from_secs(300),
    ));
    let host = Arc::new(host);
    let workloads = Arc::new(workloads);
    let prober = Arc::new(FakeProber::new(http_response(Some(200), true), true));
    let site = Arc::new(SiteMonitor::new(classifier(prober.clone()), interval * 2));
    let deps = PollerDeps {
        host: host.clone(),
        workloads: workloads.clone(),
        site,
        orchestrator: orchestrator.clone(),
        interval,
    };
    Harness {
        deps,
        hub,
        history,
        orchestrator,
        host,
        workloads,
        prober,
    }
}

pub async fn harness(dir: &TempDir, interval: Duration) -> Harness {
    harness_with(dir, interval, FakeHost::default(), FakeWorkloads::default()).await
}
