//! Default values for server settings.

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENTRY: &str = "index.toml";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Prefix of the environment variables read as settings.
pub const ENV_PREFIX: &str = "MOKIA_";

/// Settings that may be given through the environment.
pub const ENV_KEYS: &[&str] = &["host", "port", "prefix", "silent"];

pub fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

pub fn default_port() -> u16 {
    DEFAULT_PORT
}
