use serde::Deserialize;

use crate::config::settings::{ConnectionConfig, LoggingConfig, Secret};
use crate::config::token::{TokenConfig, TokenState};
use crate::consul::links::{NodeIdentity, PolicyLink, RoleLink, ServiceIdentity};

/// ================================
/// Full configuration file
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    pub logging: Option<LoggingConfig>,
    pub token: TokenConfig,
}

/// ================================
/// Validated desired state
/// ================================
/// Built once by the validator; read only for the rest of the run.
#[derive(Debug, Clone)]
pub struct DesiredToken {
    pub id: String,
    pub secret: Option<Secret>,
    pub description: String,
    pub local: bool,
    pub policies: Vec<PolicyLink>,
    pub roles: Vec<RoleLink>,
    pub service_identities: Vec<ServiceIdentity>,
    pub node_identities: Vec<NodeIdentity>,
    pub state: TokenState,
}

/// Connection settings plus desired state, ready for the reconciler.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub connection: ConnectionConfig,
    pub token: DesiredToken,
}
