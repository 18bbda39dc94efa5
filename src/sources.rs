// Leaf collaborators the dashboard samples on every cycle.

use async_trait::async_trait;

use crate::models::{SystemSample, WorkloadStats, WorkloadSummary};

/// Point-in-time host metrics.
#[async_trait]
pub trait HostMetricsSource: Send + Sync {
    async fn sample(&self) -> anyhow::Result<SystemSample>;
}

/// Workload runtime (Docker) client.
#[async_trait]
pub trait WorkloadLister: Send + Sync {
    /// All workloads, running or not.
    async fn list(&self) -> anyhow::Result<Vec<WorkloadSummary>>;

    /// Last `tail` log lines of one workload, stdout and stderr interleaved.
    async fn logs(&self, id: &str, tail: usize) -> anyhow::Result<String>;

    /// One-shot resource usage of one workload. `None` if it does not exist.
    async fn stats(&self, id: &str) -> anyhow::Result<Option<WorkloadStats>>;
}
