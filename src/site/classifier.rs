// Two-stage classification: HTTP HEAD, then a ping fallback when HEAD saw nothing.

use crate::config::SiteConfig;
use crate::models::{SiteStatus, SiteVerdict};
use crate::probe::{HeadProbe, HeadResponse, ReachabilityProber};
use std::sync::Arc;
use tokio::time::{Duration, timeout};

pub const NOTE_NO_STATUS_LINE: &str = "response without a standard HTTP status line";
pub const NOTE_PING_ONLY: &str = "host answers ping but the HTTP probe failed";

/// Upper bound for each probe stage, independent of the prober's own limits.
#[derive(Debug, Clone, Copy)]
pub struct ProbeTimeouts {
    pub head: Duration,
    pub ping: Duration,
}

impl ProbeTimeouts {
    /// The configured tool timeouts plus a little slack for process start-up.
    pub fn from_config(config: &SiteConfig) -> Self {
        let slack = Duration::from_secs(2);
        Self {
            head: Duration::from_secs(config.head_timeout_secs) + slack,
            ping: Duration::from_secs(config.ping_timeout_secs) + slack,
        }
    }
}

pub struct SiteClassifier {
    prober: Arc<dyn ReachabilityProber>,
    timeouts: ProbeTimeouts,
}

impl SiteClassifier {
    pub fn new(prober: Arc<dyn ReachabilityProber>, timeouts: ProbeTimeouts) -> Self {
        Self { prober, timeouts }
    }

    /// Never fails: every network problem ends up as PARTIAL or DOWN.
    pub async fn classify(&self) -> SiteVerdict {
        let head = timeout(self.timeouts.head, self.prober.http_head())
            .await
            .unwrap_or(HeadProbe::NoResponse);
        let https = https_active(&head);

        if let Some(verdict) = stage_one(&head, https) {
            tracing::debug!(status = ?verdict.status, status_code = ?verdict.http_status_code, "site classified from HTTP probe");
            return verdict;
        }

        let answered = timeout(self.timeouts.ping, self.prober.ping())
            .await
            .unwrap_or(false);
        let verdict = if answered {
            SiteVerdict {
                status: SiteStatus::Partial,
                http_status_code: None,
                https_active: https,
                note: Some(NOTE_PING_ONLY.into()),
            }
        } else {
            SiteVerdict {
                https_active: https,
                ..SiteVerdict::down()
            }
        };
        tracing::debug!(status = ?verdict.status, "site classified from ping fallback");
        verdict
    }
}

/// Verdict from the HEAD probe alone, or `None` when the fallback probe must decide.
pub fn stage_one(head: &HeadProbe, https_active: bool) -> Option<SiteVerdict> {
    match head {
        HeadProbe::Response(HeadResponse {
            status_code: Some(code),
            ..
        }) => Some(SiteVerdict {
            status: if (200..400).contains(code) {
                SiteStatus::Up
            } else {
                SiteStatus::Down
            },
            http_status_code: Some(*code),
            https_active,
            note: None,
        }),
        // Typically a redirect chain without a clean status line; treated as reachable.
        HeadProbe::Response(HeadResponse {
            status_code: None, ..
        }) => Some(SiteVerdict {
            status: SiteStatus::Up,
            http_status_code: Some(200),
            https_active,
            note: Some(NOTE_NO_STATUS_LINE.into()),
        }),
        HeadProbe::NoResponse => None,
    }
}

/// Security headers, or else any parsed status code >= 200.
pub fn https_active(head: &HeadProbe) -> bool {
    match head {
        HeadProbe::Response(r) if r.security_headers => true,
        HeadProbe::Response(HeadResponse {
            status_code: Some(code),
            ..
        }) => *code >= 200,
        _ => false,
    }
}
