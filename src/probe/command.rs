// Probes by shelling out to `curl` and `ping`.

use super::{HeadProbe, ReachabilityProber, parse_head_output, parse_ping_output};
use crate::config::SiteConfig;
use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;
use tokio::time::{Duration, timeout};
use tracing::instrument;

/// Extra wall-clock allowance over the tool's own timeout before we kill it.
const KILL_GRACE: Duration = Duration::from_secs(2);

pub struct CommandProber {
    url: String,
    host: String,
    user_agent: String,
    head_timeout: Duration,
    ping_timeout: Duration,
}

impl CommandProber {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            url: config.url.clone(),
            host: config.ping_host(),
            user_agent: config.user_agent.clone(),
            head_timeout: Duration::from_secs(config.head_timeout_secs),
            ping_timeout: Duration::from_secs(config.ping_timeout_secs),
        }
    }

    fn ping_command(&self) -> Command {
        let mut cmd = Command::new("ping");
        #[cfg(windows)]
        {
            let ms = self.ping_timeout.as_millis().to_string();
            cmd.args(["-n", "1", "-w", &ms]);
        }
        #[cfg(not(windows))]
        {
            let secs = self.ping_timeout.as_secs().max(1).to_string();
            cmd.args(["-c", "1", "-W", &secs]);
        }
        cmd.arg(&self.host);
        cmd
    }
}

/// Run `cmd` with a hard deadline. The child is killed if the deadline passes.
async fn run_bounded(mut cmd: Command, limit: Duration) -> Option<Output> {
    cmd.kill_on_drop(true);
    match timeout(limit, cmd.output()).await {
        Ok(Ok(output)) => Some(output),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to run probe command");
            None
        }
        Err(_) => {
            tracing::debug!(limit_ms = limit.as_millis() as u64, "probe command timed out");
            None
        }
    }
}

#[async_trait]
impl ReachabilityProber for CommandProber {
    #[instrument(skip(self), fields(probe = "curl", url = %self.url))]
    async fn http_head(&self) -> HeadProbe {
        let mut cmd = Command::new("curl");
        cmd.args(["-s", "-L", "-I", "--max-time"])
            .arg(self.head_timeout.as_secs().max(1).to_string())
            .arg("-A")
            .arg(&self.user_agent)
            .arg(&self.url);

        let Some(output) = run_bounded(cmd, self.head_timeout + KILL_GRACE).await else {
            return HeadProbe::NoResponse;
        };
        if !output.status.success() {
            // Timeouts (28) and DNS failures (6) land here.
            tracing::debug!(exit_code = ?output.status.code(), "curl failed");
            return HeadProbe::NoResponse;
        }
        parse_head_output(&String::from_utf8_lossy(&output.stdout))
    }

    #[instrument(skip(self), fields(probe = "ping", host = %self.host))]
    async fn ping(&self) -> bool {
        let cmd = self.ping_command();
        match run_bounded(cmd, self.ping_timeout + KILL_GRACE).await {
            Some(output) => {
                output.status.success() && parse_ping_output(&String::from_utf8_lossy(&output.stdout))
            }
            None => false,
        }
    }
}
