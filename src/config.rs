use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub monitoring: MonitoringConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// JSON array file for the system series.
    pub system_path: String,
    /// JSON array file for the website series.
    pub site_path: String,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Minimum spacing between two retained buckets.
    #[serde(default = "default_bucket_interval_secs")]
    pub bucket_interval_secs: u64,
}

fn default_max_entries() -> usize {
    1000
}

fn default_bucket_interval_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Per-session polling interval for both cycles, and the shared site probe interval.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// How often to log app stats (sessions, buckets appended, probes) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
    /// History updates kept in the broadcast channel (slow sessions may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
    /// Outbound events buffered per session before samples are dropped.
    #[serde(default = "default_session_channel_capacity")]
    pub session_channel_capacity: usize,
}

fn default_sample_interval_ms() -> u64 {
    5000
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

fn default_broadcast_capacity() -> usize {
    16
}

fn default_session_channel_capacity() -> usize {
    32
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin probed with HEAD, e.g. "https://example.org".
    pub url: String,
    /// Host for the fallback ping; derived from `url` when omitted.
    #[serde(default)]
    pub ping_host: Option<String>,
    #[serde(default = "default_head_timeout_secs")]
    pub head_timeout_secs: u64,
    #[serde(default = "default_ping_timeout_secs")]
    pub ping_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_head_timeout_secs() -> u64 {
    10
}

fn default_ping_timeout_secs() -> u64 {
    5
}

fn default_user_agent() -> String {
    crate::version::probe_user_agent()
}

impl SiteConfig {
    /// `ping_host` if set, else the host of `url` (IPv6 without brackets).
    /// Empty when neither yields a host; `validate` rejects that case.
    pub fn ping_host(&self) -> String {
        self.ping_host
            .clone()
            .filter(|h| !h.is_empty())
            .or_else(|| url_host(&self.url))
            .unwrap_or_default()
    }
}

fn url_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_start_matches('[').trim_end_matches(']').to_string())
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.history.system_path.is_empty(),
            "history.system_path must be non-empty"
        );
        anyhow::ensure!(
            !self.history.site_path.is_empty(),
            "history.site_path must be non-empty"
        );
        anyhow::ensure!(
            self.history.system_path != self.history.site_path,
            "history.system_path and history.site_path must differ"
        );
        anyhow::ensure!(
            self.history.max_entries > 0,
            "history.max_entries must be > 0, got {}",
            self.history.max_entries
        );
        anyhow::ensure!(
            self.history.bucket_interval_secs > 0,
            "history.bucket_interval_secs must be > 0, got {}",
            self.history.bucket_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.broadcast_capacity > 0,
            "monitoring.broadcast_capacity must be > 0, got {}",
            self.monitoring.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.session_channel_capacity >= 4,
            "monitoring.session_channel_capacity must be >= 4, got {}",
            self.monitoring.session_channel_capacity
        );
        let url = Url::parse(&self.site.url)
            .map_err(|e| anyhow::anyhow!("site.url {:?} is not a valid URL: {}", self.site.url, e))?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "site.url must use http or https, got {:?}",
            self.site.url
        );
        anyhow::ensure!(
            url.host_str().is_some_and(|h| !h.is_empty()),
            "site.url {:?} has no host",
            self.site.url
        );
        anyhow::ensure!(
            self.site.head_timeout_secs > 0,
            "site.head_timeout_secs must be > 0, got {}",
            self.site.head_timeout_secs
        );
        anyhow::ensure!(
            self.site.ping_timeout_secs > 0,
            "site.ping_timeout_secs must be > 0, got {}",
            self.site.ping_timeout_secs
        );
        Ok(())
    }
}
