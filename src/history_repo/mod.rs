// History store: two bounded series (system, website) with JSON write-through.
// All access goes through one async mutex, so append + evict + persist never interleave.

mod file;
mod series;

pub use series::Series;

use crate::config::HistoryConfig;
use crate::models::{HistoryPeriod, HistorySnapshot, SiteBucket, SystemBucket};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("bucket at {timestamp} is older than the last entry at {last}")]
    OutOfOrder { timestamp: u64, last: u64 },
    #[error("history io: {0}")]
    Io(#[from] std::io::Error),
    #[error("history json: {0}")]
    Json(#[from] serde_json::Error),
}

struct HistoryState {
    system: Series<SystemBucket>,
    site: Series<SiteBucket>,
}

pub struct HistoryRepo {
    state: Mutex<HistoryState>,
    system_path: PathBuf,
    site_path: PathBuf,
}

impl HistoryRepo {
    pub async fn load(config: &HistoryConfig) -> Self {
        Self::open(&config.system_path, &config.site_path, config.max_entries).await
    }

    /// Read both series from disk; missing or corrupt files start empty.
    pub async fn open(
        system_path: impl AsRef<Path>,
        site_path: impl AsRef<Path>,
        max_entries: usize,
    ) -> Self {
        let system_path = system_path.as_ref().to_path_buf();
        let site_path = site_path.as_ref().to_path_buf();
        let system = Series::from_entries(file::read_series(&system_path).await, max_entries);
        let site = Series::from_entries(file::read_series(&site_path).await, max_entries);
        tracing::info!(
            system_entries = system.len(),
            site_entries = site.len(),
            "history loaded"
        );
        Self {
            state: Mutex::new(HistoryState { system, site }),
            system_path,
            site_path,
        }
    }

    /// Exclusive access for a check-then-append sequence.
    pub async fn lock(&self) -> HistoryGuard<'_> {
        HistoryGuard {
            state: self.state.lock().await,
            repo: self,
        }
    }

    pub async fn append_system(&self, bucket: SystemBucket) -> Result<(), HistoryError> {
        let mut guard = self.lock().await;
        guard.push_system(bucket)?;
        guard.persist_logged().await;
        Ok(())
    }

    pub async fn append_site(&self, bucket: SiteBucket) -> Result<(), HistoryError> {
        let mut guard = self.lock().await;
        guard.push_site(bucket)?;
        guard.persist_logged().await;
        Ok(())
    }

    pub async fn query_system(&self, period: HistoryPeriod, now: u64) -> Vec<SystemBucket> {
        self.state.lock().await.system.since(period, now)
    }

    pub async fn query_site(&self, period: HistoryPeriod, now: u64) -> Vec<SiteBucket> {
        self.state.lock().await.site.since(period, now)
    }

    pub async fn snapshot(&self) -> HistorySnapshot {
        self.lock().await.snapshot()
    }
}

/// Held while deciding on and applying appends. Dropping it releases the store.
pub struct HistoryGuard<'a> {
    state: MutexGuard<'a, HistoryState>,
    repo: &'a HistoryRepo,
}

impl HistoryGuard<'_> {
    pub fn last_system_timestamp(&self) -> Option<u64> {
        self.state.system.last_timestamp()
    }

    pub fn last_site_timestamp(&self) -> Option<u64> {
        self.state.site.last_timestamp()
    }

    pub fn push_system(&mut self, bucket: SystemBucket) -> Result<usize, HistoryError> {
        self.state.system.push(bucket)
    }

    pub fn push_site(&mut self, bucket: SiteBucket) -> Result<usize, HistoryError> {
        self.state.site.push(bucket)
    }

    /// Overwrite both files with the in-memory series. Empty series are not written.
    #[instrument(skip(self), fields(repo = "history", operation = "persist"))]
    pub async fn persist(&self) -> Result<(), HistoryError> {
        if !self.state.system.is_empty() {
            file::write_series(&self.repo.system_path, self.state.system.entries()).await?;
        }
        if !self.state.site.is_empty() {
            file::write_series(&self.repo.site_path, self.state.site.entries()).await?;
        }
        Ok(())
    }

    /// `persist`, logging failures. The in-memory series stay authoritative.
    pub async fn persist_logged(&self) {
        if let Err(e) = self.persist().await {
            tracing::warn!(error = %e, operation = "persist_history", "history write failed");
        }
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            system: self.state.system.to_vec(),
            site: self.state.site.to_vec(),
        }
    }
}
