// History buckets (one retained entry per bucket interval) and query periods

use serde::{Deserialize, Serialize};

use super::{SiteStatus, SiteVerdict, SystemSample};

const MS_PER_HOUR: u64 = 60 * 60 * 1000;

/// Anything stored in a history series.
pub trait Timestamped {
    fn timestamp(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemBucket {
    pub timestamp: u64,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub uptime_seconds: u64,
}

impl SystemBucket {
    pub fn from_sample(sample: &SystemSample) -> Self {
        Self {
            timestamp: sample.timestamp,
            cpu_percent: sample.cpu_percent(),
            memory_percent: sample.memory_percent(),
            uptime_seconds: sample.uptime_seconds,
        }
    }
}

impl Timestamped for SystemBucket {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteBucket {
    pub timestamp: u64,
    pub status: SiteStatus,
    pub https_active: bool,
}

impl SiteBucket {
    pub fn from_verdict(timestamp: u64, verdict: &SiteVerdict) -> Self {
        Self {
            timestamp,
            status: verdict.status,
            https_active: verdict.https_active,
        }
    }
}

impl Timestamped for SiteBucket {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// Look-back window for history queries. Unknown or missing values mean 24h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl HistoryPeriod {
    /// Parse `24h`, `7d` or `30d`; anything else falls back to 24h.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("7d") => HistoryPeriod::Week,
            Some("30d") => HistoryPeriod::Month,
            _ => HistoryPeriod::Day,
        }
    }

    pub fn as_millis(self) -> u64 {
        match self {
            HistoryPeriod::Day => 24 * MS_PER_HOUR,
            HistoryPeriod::Week => 7 * 24 * MS_PER_HOUR,
            HistoryPeriod::Month => 30 * 24 * MS_PER_HOUR,
        }
    }
}

/// Both series as of one instant; shared by reference with every session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub system: Vec<SystemBucket>,
    pub site: Vec<SiteBucket>,
}
