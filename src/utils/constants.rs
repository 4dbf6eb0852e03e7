//! Shared constants and defaults

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8500;
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_CONFIG_PATH: &str = "consul-token.yaml";

// Supported schemes
pub const SCHEME_HTTP: &str = "http";
pub const SCHEME_HTTPS: &str = "https";

pub const AUTH_HEADER: &str = "X-Consul-Token";
