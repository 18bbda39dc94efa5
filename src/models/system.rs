// Point-in-time host snapshot

use serde::{Deserialize, Serialize};

/// One host sample. Field names follow the `systemStats` wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSample {
    pub timestamp: u64,
    #[serde(rename = "uptime")]
    pub uptime_seconds: u64,
    pub hostname: String,
    pub platform: String,
    pub cpu_count: u32,
    #[serde(rename = "totalMemory")]
    pub total_memory_bytes: u64,
    #[serde(rename = "freeMemory")]
    pub free_memory_bytes: u64,
    #[serde(rename = "loadAvg")]
    pub load_average: [f64; 3],
}

impl SystemSample {
    /// Zeroed sample sent when the host metrics source fails.
    pub fn unavailable(timestamp: u64) -> Self {
        Self {
            timestamp,
            uptime_seconds: 0,
            hostname: "unknown".into(),
            platform: "unknown".into(),
            cpu_count: 0,
            total_memory_bytes: 0,
            free_memory_bytes: 0,
            load_average: [0.0; 3],
        }
    }

    /// 1-minute load average relative to core count, capped at 100.
    pub fn cpu_percent(&self) -> f64 {
        if self.cpu_count == 0 {
            return 0.0;
        }
        (self.load_average[0] * 100.0 / self.cpu_count as f64).clamp(0.0, 100.0)
    }

    pub fn memory_percent(&self) -> f64 {
        if self.total_memory_bytes == 0 {
            return 0.0;
        }
        let used = self.total_memory_bytes.saturating_sub(self.free_memory_bytes);
        (used as f64 / self.total_memory_bytes as f64) * 100.0
    }
}
