// Host metrics via sysinfo

use crate::models::{SystemSample, unix_millis};
use crate::sources::HostMetricsSource;
use async_trait::async_trait;
use std::sync::Arc;
use sysinfo::System;
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
        }
    }
}

#[async_trait]
impl HostMetricsSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "sample"))]
    async fn sample(&self) -> anyhow::Result<SystemSample> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let load = System::load_average();
            Ok::<_, anyhow::Error>(SystemSample {
                timestamp: unix_millis(),
                uptime_seconds: System::uptime(),
                hostname: System::host_name().unwrap_or_else(|| "unknown".into()),
                platform: std::env::consts::OS.into(),
                cpu_count: sys.cpus().len() as u32,
                total_memory_bytes: sys.total_memory(),
                free_memory_bytes: sys.available_memory(),
                load_average: [load.one, load.five, load.fifteen],
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}
