// Build-time identity from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// User-Agent sent by outbound probes unless the config overrides it.
pub fn probe_user_agent() -> String {
    format!("Mozilla/5.0 (compatible; {}/{}; dashboard monitor)", NAME, VERSION)
}
