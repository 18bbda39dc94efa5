// Push events sent to dashboard sessions: {"type": "...", "data": ...}

use serde::{Deserialize, Serialize};

use super::{HistorySnapshot, SiteBucket, SiteVerdict, SystemBucket, SystemSample, WorkloadSummary};

/// `systemStats` payload: the host sample flattened, plus the site verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatsPayload {
    #[serde(flatten)]
    pub sample: SystemSample,
    pub website: SiteVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    SystemStats(SystemStatsPayload),
    Containers(Vec<WorkloadSummary>),
    SystemHistory(Vec<SystemBucket>),
    WebsiteHistory(Vec<SiteBucket>),
}

impl ServerEvent {
    pub fn system_stats(sample: SystemSample, website: SiteVerdict) -> Self {
        ServerEvent::SystemStats(SystemStatsPayload { sample, website })
    }

    /// `systemHistory` followed by `websiteHistory` for one snapshot.
    pub fn history(snapshot: &HistorySnapshot) -> [ServerEvent; 2] {
        [
            ServerEvent::SystemHistory(snapshot.system.clone()),
            ServerEvent::WebsiteHistory(snapshot.site.clone()),
        ]
    }

    /// Event name as seen by the dashboard.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::SystemStats(_) => "systemStats",
            ServerEvent::Containers(_) => "containers",
            ServerEvent::SystemHistory(_) => "systemHistory",
            ServerEvent::WebsiteHistory(_) => "websiteHistory",
        }
    }
}
