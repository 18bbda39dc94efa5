// Bucket-boundary decisions: which samples become history, and when everyone hears about it.

use crate::history_repo::HistoryRepo;
use crate::hub::BroadcastHub;
use crate::models::{SiteBucket, SiteVerdict, SystemBucket, SystemSample};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Where a new sample falls relative to the last retained bucket of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketState {
    /// Series is empty; the first sample is always kept.
    NoHistory,
    /// Less than one bucket interval since the last entry; not kept.
    WithinBucket,
    /// At least one bucket interval has passed; kept.
    BucketDue,
}

impl BucketState {
    pub fn evaluate(last: Option<u64>, now: u64, interval_ms: u64) -> Self {
        match last {
            None => BucketState::NoHistory,
            Some(last) if now.saturating_sub(last) < interval_ms => BucketState::WithinBucket,
            Some(_) => BucketState::BucketDue,
        }
    }

    pub fn is_due(self) -> bool {
        matches!(self, BucketState::NoHistory | BucketState::BucketDue)
    }
}

/// Result of one `record` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketOutcome {
    pub system: BucketState,
    pub site: BucketState,
    /// Sessions that received the history update; `None` when nothing was appended.
    pub broadcast_to: Option<usize>,
}

pub struct Orchestrator {
    history: Arc<HistoryRepo>,
    hub: Arc<BroadcastHub>,
    bucket_interval_ms: u64,
    buckets_appended_total: AtomicU64,
}

impl Orchestrator {
    pub fn new(history: Arc<HistoryRepo>, hub: Arc<BroadcastHub>, bucket_interval: Duration) -> Self {
        Self {
            history,
            hub,
            bucket_interval_ms: bucket_interval.as_millis() as u64,
            buckets_appended_total: AtomicU64::new(0),
        }
    }

    pub fn history(&self) -> &Arc<HistoryRepo> {
        &self.history
    }

    pub fn buckets_appended_total(&self) -> u64 {
        self.buckets_appended_total.load(Ordering::Relaxed)
    }

    /// Evaluate one system+site sample against both series, append what is due,
    /// broadcast the new history to every session, then write it to disk.
    pub async fn record(&self, sample: &SystemSample, verdict: &SiteVerdict) -> BucketOutcome {
        let now = sample.timestamp;
        let mut history = self.history.lock().await;
        let system = BucketState::evaluate(history.last_system_timestamp(), now, self.bucket_interval_ms);
        let site = BucketState::evaluate(history.last_site_timestamp(), now, self.bucket_interval_ms);

        let mut appended = 0u64;
        if system.is_due() {
            match history.push_system(SystemBucket::from_sample(sample)) {
                Ok(_) => appended += 1,
                Err(e) => tracing::warn!(error = %e, series = "system", "bucket rejected"),
            }
        }
        if site.is_due() {
            match history.push_site(SiteBucket::from_verdict(now, verdict)) {
                Ok(_) => appended += 1,
                Err(e) => tracing::warn!(error = %e, series = "site", "bucket rejected"),
            }
        }
        if appended == 0 {
            return BucketOutcome {
                system,
                site,
                broadcast_to: None,
            };
        }

        // No await between push and broadcast: a cancelled caller cannot leave an
        // appended bucket unannounced. Still under the store lock, so sessions see
        // updates in append order.
        let snapshot = Arc::new(history.snapshot());
        let delivered = self.hub.broadcast_history_update(snapshot);
        self.buckets_appended_total.fetch_add(appended, Ordering::Relaxed);
        history.persist_logged().await;
        drop(history);

        tracing::info!(
            timestamp = now,
            system = ?system,
            site = ?site,
            sessions = delivered,
            "history bucket appended"
        );
        BucketOutcome {
            system,
            site,
            broadcast_to: Some(delivered),
        }
    }
}
