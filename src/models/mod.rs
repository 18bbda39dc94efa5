// Domain models: samples, workloads, site verdicts, history buckets and push events.

mod container;
mod events;
mod history;
mod site;
mod system;

pub use container::{ContainerState, PortMapping, WorkloadStats, WorkloadSummary};
pub use events::{ServerEvent, SystemStatsPayload};
pub use history::{HistoryPeriod, HistorySnapshot, SiteBucket, SystemBucket, Timestamped};
pub use site::{SiteStatus, SiteVerdict};
pub use system::SystemSample;

/// Milliseconds since the Unix epoch; 0 if the system clock is before 1970.
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}
