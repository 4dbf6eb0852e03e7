use std::fmt;

use serde::Deserialize;

use crate::utils::constants::{DEFAULT_HOST, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_PORT, DEFAULT_SCHEME};

/// ================================
/// Secret values
/// ================================
/// Management token or secret seed; never printed by `Debug`.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// ================================
/// Consul agent connection
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// invariant: http or https
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_true")]
    pub validate_tls: bool,
    /// sent as X-Consul-Token; empty counts as absent
    #[serde(default)]
    pub management_token: Option<Secret>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scheme: default_scheme(),
            validate_tls: true,
            management_token: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ConnectionConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/v1", self.scheme, self.host, self.port)
    }

    pub fn management_token(&self) -> Option<&Secret> {
        self.management_token.as_ref().filter(|token| !token.is_empty())
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_owned()
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}
