use tracing::{debug, info};

use crate::config::token::TokenState;
use crate::config::types::DesiredToken;
use crate::consul::api::{token_view, ConsulApi, TokenWrite};
use crate::consul::token::RemoteToken;
use crate::consul::transport::Transport;
use crate::consul::version::ApiVersion;
use crate::errors::ReconcileError;
use crate::reconcile::outcome::Outcome;

/// Drives one token towards its desired state.
///
/// Calls are strictly sequential: version, listing, optional full fetch,
/// then at most one mutating call. Nothing is cached between runs, and two
/// reconcilers racing on the same id may lose an update.
pub struct Reconciler<T> {
    api: ConsulApi<T>,
}

impl<T: Transport> Reconciler<T> {
    pub fn new(api: ConsulApi<T>) -> Self {
        Self { api }
    }

    pub async fn reconcile(&self, desired: &DesiredToken) -> Result<Outcome, ReconcileError> {
        let version = self.api.negotiate_version().await?;
        info!("consul agent version {}", version);

        let outcome = match desired.state {
            TokenState::Present => self.set_token(desired, &version).await?,
            TokenState::Absent => self.remove_token(desired).await?,
        };

        info!(
            "token '{}' reconciled, operation: {:?}, changed: {}",
            desired.id, outcome.operation, outcome.changed
        );
        Ok(outcome)
    }

    async fn set_token(
        &self,
        desired: &DesiredToken,
        version: &ApiVersion,
    ) -> Result<Outcome, ReconcileError> {
        let mut directory = self.api.list_tokens().await?;

        let Some(index_entry) = directory.remove(&desired.id) else {
            info!("token '{}' not found, creating", desired.id);
            let created = self
                .api
                .create_token(&TokenWrite::create(desired, version))
                .await?;
            return Ok(Outcome::created(created));
        };

        let accessor_id = index_entry
            .accessor_id
            .clone()
            .unwrap_or_else(|| desired.id.to_owned());
        info!("token '{}' found, updating", accessor_id);

        let full = self.api.fetch_token(&accessor_id).await?;
        let current = RemoteToken::merge(index_entry, full);

        let updated = self
            .api
            .update_token(&accessor_id, &TokenWrite::update(desired, version))
            .await?;
        let view = token_view(&format!("/acl/token/{}", accessor_id), &updated)?;
        let changed = current.differs_from(&view);
        debug!("token '{}' changed: {}", accessor_id, changed);

        Ok(Outcome::updated(changed, updated))
    }

    async fn remove_token(&self, desired: &DesiredToken) -> Result<Outcome, ReconcileError> {
        let directory = self.api.list_tokens().await?;

        let Some(accessor_id) = directory
            .get(&desired.id)
            .and_then(|entry| entry.accessor_id.as_deref())
        else {
            info!("token '{}' already absent", desired.id);
            return Ok(Outcome::removed(false));
        };

        self.api.delete_token(accessor_id).await?;
        Ok(Outcome::removed(true))
    }
}
