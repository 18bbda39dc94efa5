// Config loading and validation tests

use homedash::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 3001
host = "0.0.0.0"

[history]
system_path = "data/system_history.json"
site_path = "data/website_history.json"

[monitoring]
sample_interval_ms = 5000
stats_log_interval_secs = 60

[site]
url = "https://example.org"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 3001);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.history.system_path, "data/system_history.json");
    assert_eq!(config.monitoring.sample_interval_ms, 5000);
    assert_eq!(config.site.url, "https://example.org");
}

#[test]
fn test_config_defaults() {
    let config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    assert_eq!(config.history.max_entries, 1000);
    assert_eq!(config.history.bucket_interval_secs, 300);
    assert_eq!(config.monitoring.broadcast_capacity, 16);
    assert_eq!(config.monitoring.session_channel_capacity, 32);
    assert_eq!(config.site.head_timeout_secs, 10);
    assert_eq!(config.site.ping_timeout_secs, 5);
    assert!(config.site.user_agent.contains("homedash/"));
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 3001", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_history_path() {
    let bad = VALID_CONFIG.replace("\"data/system_history.json\"", "\"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("history.system_path"));
}

#[test]
fn test_config_validation_rejects_shared_history_path() {
    let bad = VALID_CONFIG.replace("data/website_history.json", "data/system_history.json");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("must differ"));
}

#[test]
fn test_config_validation_rejects_max_entries_zero() {
    let bad = VALID_CONFIG.replace(
        "site_path = \"data/website_history.json\"",
        "site_path = \"data/website_history.json\"\nmax_entries = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("history.max_entries"));
}

#[test]
fn test_config_validation_rejects_sample_interval_zero() {
    let bad = VALID_CONFIG.replace("sample_interval_ms = 5000", "sample_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("sample_interval_ms"));
}

#[test]
fn test_config_validation_rejects_tiny_session_channel() {
    let bad = VALID_CONFIG.replace(
        "stats_log_interval_secs = 60",
        "stats_log_interval_secs = 60\nsession_channel_capacity = 2",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("session_channel_capacity"));
}

#[test]
fn test_config_validation_rejects_non_http_url() {
    let bad = VALID_CONFIG.replace("https://example.org", "ftp://example.org");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("site.url"));
}

#[test]
fn test_config_validation_rejects_url_without_host() {
    let bad = VALID_CONFIG.replace("https://example.org", "https://");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("site.url"));
}

#[test]
fn test_config_validation_rejects_malformed_urls() {
    for url in [
        "https://exa mple.org",
        "https://example.org:notaport/",
        "http://[::1",
    ] {
        let bad = VALID_CONFIG.replace("https://example.org", url);
        let err = AppConfig::load_from_str(&bad)
            .expect_err(&format!("{} should be rejected", url));
        assert!(
            err.to_string().contains("site.url"),
            "unexpected error for {}: {}",
            url,
            err
        );
    }
}

#[test]
fn test_ping_host_derived_from_url() {
    let mut config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    assert_eq!(config.site.ping_host(), "example.org");

    config.site.url = "http://user:pw@example.org:8443/status?x=1".into();
    assert_eq!(config.site.ping_host(), "example.org");

    config.site.url = "https://[2001:db8::1]:443/".into();
    assert_eq!(config.site.ping_host(), "2001:db8::1");
}

#[test]
fn test_ping_host_override() {
    let with_host = VALID_CONFIG.replace(
        "url = \"https://example.org\"",
        "url = \"https://example.org\"\nping_host = \"10.0.0.5\"",
    );
    let config = AppConfig::load_from_str(&with_host).unwrap();
    assert_eq!(config.site.ping_host(), "10.0.0.5");
}
