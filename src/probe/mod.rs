// Outbound reachability probes for the monitored site.
// Raw tool output is parsed into typed results here; classification lives in `site`.

mod command;
mod parse;

pub use command::CommandProber;
pub use parse::{parse_head_output, parse_ping_output};

use async_trait::async_trait;

/// What an HTTP HEAD probe saw, after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadProbe {
    /// Some output came back. `status_code` is `None` when no status line was recognised.
    Response(HeadResponse),
    /// Nothing came back: timeout, DNS failure, refused connection, tool failure.
    NoResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    pub status_code: Option<u16>,
    /// Any of the recognised transport-security response headers was present.
    pub security_headers: bool,
}

#[async_trait]
pub trait ReachabilityProber: Send + Sync {
    /// HEAD request against the monitored origin, following redirects.
    async fn http_head(&self) -> HeadProbe;

    /// Single network-layer echo to the monitored host. `true` if it answered.
    async fn ping(&self) -> bool;
}
