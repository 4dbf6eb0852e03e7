use tracing::debug;

use crate::config::settings::ConnectionConfig;
use crate::config::proc_validator::validate_service_config;
use crate::config::token::TokenConfig;
use crate::consul::api::ConsulApi;
use crate::consul::transport::Transport;
use crate::errors::ReconcileError;

pub mod outcome;
pub mod reconciler;

pub use outcome::{Operation, Outcome};
pub use reconciler::Reconciler;

/// Validate caller input, then reconcile it over `transport`.
///
/// Validation failures return before the transport is used.
pub async fn reconcile_token<T: Transport>(
    connection: ConnectionConfig,
    token: &TokenConfig,
    transport: T,
) -> Result<Outcome, ReconcileError> {
    let configuration = validate_service_config(connection, token)?;
    debug!("reconciling token {:?}", configuration.token);

    let api = ConsulApi::new(transport, &configuration.connection)?;
    Reconciler::new(api).reconcile(&configuration.token).await
}
