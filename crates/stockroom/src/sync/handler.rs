//! Queue-side entry point: turns task messages into pipeline runs.

use sea_orm::DatabaseConnection;

use crate::crypto::SecretCipher;
use crate::entity::prelude::*;
use crate::queue::{SyncTaskPayload, TaskError, TaskHandler, TaskKind, TaskMessage};
use crate::shopify::ShopifyClient;
use crate::store;

use super::error::{Result, SyncError};
use super::pipeline;
use super::types::SyncStats;

/// Handles `sync.*` tasks: resolves the client, runs the pipeline, and on
/// any error records `failed` in a separate transaction before deciding
/// whether the queue should retry.
pub struct SyncTaskHandler {
    db: DatabaseConnection,
    cipher: SecretCipher,
}

impl SyncTaskHandler {
    pub fn new(db: DatabaseConnection, cipher: SecretCipher) -> Self {
        Self { db, cipher }
    }

    /// Resolve the access token for a payload.
    ///
    /// The payload normally carries the decrypted token; an empty token means
    /// the enqueuer chose not to ship it, so the stored credential is
    /// re-resolved and decrypted here.
    async fn resolve_token(&self, payload: &SyncTaskPayload) -> Result<String> {
        if !payload.access_token.is_empty() {
            return Ok(payload.access_token.clone());
        }

        let integration = store::find_integration(&self.db, &payload.integration_id)
            .await?
            .ok_or_else(|| {
                SyncError::Validation(format!(
                    "integration {} not found",
                    payload.integration_id
                ))
            })?;
        let credential = store::find_credential_for_shop(&self.db, &integration.shop_id)
            .await?
            .ok_or_else(|| SyncError::Auth("no credential with a token for shop".to_owned()))?;
        let token = self
            .cipher
            .decrypt(&credential.access_token)
            .map_err(|err| SyncError::Auth(format!("failed to decrypt access token: {err}")))?;
        if token.is_empty() {
            return Err(SyncError::Auth("stored access token is empty".to_owned()));
        }
        Ok(token)
    }

    async fn run(&self, kind: TaskKind, payload: &SyncTaskPayload) -> Result<SyncStats> {
        let token = self.resolve_token(payload).await?;
        let client = ShopifyClient::new(&payload.shop_domain, &token)
            .map_err(|err| SyncError::upstream("failed to build platform client", err))?;

        match kind {
            TaskKind::FullSync => {
                pipeline::run_full_sync(&self.db, &client, &payload.integration_id).await
            }
            TaskKind::LocationsSync => {
                pipeline::run_locations_sync(&self.db, &client, &payload.integration_id).await
            }
            TaskKind::ProductsSync => {
                pipeline::run_products_sync(&self.db, &client, &payload.integration_id).await
            }
            TaskKind::OrdersSync => {
                pipeline::run_orders_sync(&self.db, &client, &payload.integration_id).await
            }
        }
    }

    fn state_entity(kind: TaskKind) -> SyncEntity {
        match kind {
            TaskKind::FullSync => SyncEntity::FullSync,
            TaskKind::LocationsSync => SyncEntity::Locations,
            TaskKind::ProductsSync => SyncEntity::Products,
            TaskKind::OrdersSync => SyncEntity::Orders,
        }
    }
}

#[async_trait::async_trait]
impl TaskHandler for SyncTaskHandler {
    async fn handle(&self, task: &TaskMessage) -> std::result::Result<(), TaskError> {
        let payload = task
            .sync_payload()
            .map_err(|err| TaskError::skip(format!("undecodable sync payload: {err}")))?;

        match self.run(task.kind, &payload).await {
            Ok(_) => Ok(()),
            Err(err) => {
                // The pipeline's transaction has rolled back; record the
                // failure in its own transaction so the gate opens again.
                let message = err.to_string();
                if let Err(state_err) = store::mark_failed(
                    &self.db,
                    &payload.integration_id,
                    Self::state_entity(task.kind),
                    &message,
                )
                .await
                {
                    tracing::error!(
                        integration_id = %payload.integration_id,
                        error = %state_err,
                        "failed to record sync failure"
                    );
                }

                if err.is_retriable() {
                    Err(TaskError::retry(message))
                } else {
                    Err(TaskError::skip(message))
                }
            }
        }
    }
}
