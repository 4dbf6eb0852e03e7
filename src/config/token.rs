use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::settings::Secret;

/// Whether the token should exist after the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    #[default]
    Present,
    Absent,
}

/// ================================
/// Desired token, as written by the caller
/// ================================
/// List elements stay untyped here and are checked by the validator.
#[derive(Debug, Deserialize, Clone)]
pub struct TokenConfig {
    /// becomes the AccessorID on creation
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub local: bool,
    /// SecretID used on creation only
    #[serde(default)]
    pub secret: Option<Secret>,
    #[serde(default)]
    pub state: TokenState,
    #[serde(default)]
    pub policies: Vec<Value>,
    #[serde(default)]
    pub roles: Vec<Value>,
    #[serde(default)]
    pub service_identities: Vec<Value>,
    #[serde(default)]
    pub node_identities: Vec<Value>,
}

impl TokenConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            local: false,
            secret: None,
            state: TokenState::Present,
            policies: Vec::new(),
            roles: Vec::new(),
            service_identities: Vec::new(),
            node_identities: Vec::new(),
        }
    }
}
