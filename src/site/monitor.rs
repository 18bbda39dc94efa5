// One shared probe per interval, read by every session.

use super::SiteClassifier;
use crate::models::SiteVerdict;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Probed {
    at: Instant,
    verdict: SiteVerdict,
}

pub struct SiteMonitor {
    classifier: SiteClassifier,
    latest: watch::Sender<Option<Probed>>,
    max_age: Duration,
    probes_total: AtomicU64,
}

impl SiteMonitor {
    /// Verdicts older than `max_age` are re-probed on read.
    pub fn new(classifier: SiteClassifier, max_age: Duration) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            classifier,
            latest,
            max_age,
            probes_total: AtomicU64::new(0),
        }
    }

    /// Probe now and publish the result.
    pub async fn refresh(&self) -> SiteVerdict {
        let verdict = self.classifier.classify().await;
        self.probes_total.fetch_add(1, Ordering::Relaxed);
        self.latest.send_replace(Some(Probed {
            at: Instant::now(),
            verdict: verdict.clone(),
        }));
        verdict
    }

    /// Last published verdict if it is still fresh.
    pub fn current(&self) -> Option<SiteVerdict> {
        self.latest
            .borrow()
            .as_ref()
            .filter(|p| p.at.elapsed() <= self.max_age)
            .map(|p| p.verdict.clone())
    }

    /// Fresh verdict, probing directly when the shared one is missing or stale.
    pub async fn latest(&self) -> SiteVerdict {
        match self.current() {
            Some(verdict) => verdict,
            None => self.refresh().await,
        }
    }

    pub fn probes_total(&self) -> u64 {
        self.probes_total.load(Ordering::Relaxed)
    }
}
