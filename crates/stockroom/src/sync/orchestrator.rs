//! Sync orchestration: trigger, dedup gate, status.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::crypto::SecretCipher;
use crate::entity::prelude::*;
use crate::id::UserId;
use crate::queue::{SyncTaskPayload, TaskKind, TaskQueue};
use crate::shopify::normalize_domain;
use crate::store;

use super::error::{Result, SyncError};
use super::types::{SyncOutcome, SyncRequest, SyncStatusReport};

/// Accepts trigger requests, gates them, and dispatches sync jobs.
///
/// The orchestrator holds its collaborators directly: the database handle,
/// the queue seam, and the credential cipher. The dedup gate is delegated to
/// the conditional claim in the store, so concurrent triggers for the same
/// integration serialize in the database - the claim is written *before* the
/// enqueue, and an enqueue failure flips it to `failed`.
pub struct SyncOrchestrator {
    db: DatabaseConnection,
    queue: Arc<dyn TaskQueue>,
    cipher: SecretCipher,
}

impl SyncOrchestrator {
    pub fn new(db: DatabaseConnection, queue: Arc<dyn TaskQueue>, cipher: SecretCipher) -> Self {
        Self { db, queue, cipher }
    }

    /// Trigger a full sync for a (user, shop) pair.
    ///
    /// Validates access, resolves or creates the integration, applies the
    /// dedup gate (unless `force`), claims `in_progress`, and enqueues the
    /// job. Returns `in_progress` on successful enqueue, or the skip reason
    /// without enqueue when the gate trips.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn trigger_sync(&self, request: SyncRequest) -> Result<SyncOutcome> {
        store::find_user(&self.db, &request.user_id)
            .await?
            .ok_or_else(|| SyncError::Validation("user not found".to_owned()))?;

        let domain = normalize_domain(&request.shop_domain);
        let shop = store::find_shop_by_domain(&self.db, &domain)
            .await?
            .ok_or_else(|| SyncError::Validation(format!("shop not found: {domain}")))?;

        let credential = store::find_credential(&self.db, &request.user_id, &shop.id)
            .await?
            .ok_or_else(|| SyncError::Auth("no credential for user and shop".to_owned()))?;
        let access_token = self
            .cipher
            .decrypt(&credential.access_token)
            .map_err(|err| SyncError::Auth(format!("failed to decrypt access token: {err}")))?;
        if access_token.is_empty() {
            return Err(SyncError::Auth(
                "no access token found for user and shop".to_owned(),
            ));
        }

        let integration =
            store::get_or_create_integration(&self.db, &shop.id, PlatformKind::Shopify, &domain)
                .await?;

        let claimed = store::claim_in_progress(
            &self.db,
            &integration.id,
            SyncEntity::FullSync,
            request.force,
        )
        .await?;

        if !claimed {
            // Gate tripped; report the state that blocked us.
            let state =
                store::find_sync_state(&self.db, &integration.id, SyncEntity::FullSync).await?;
            let (status, last_synced) = match &state {
                Some(row) => (SyncStatusReport::from(row.status), row.last_synced_at),
                // The row vanished between claim and read; only another
                // trigger can have claimed it.
                None => (SyncStatusReport::InProgress, None),
            };
            tracing::info!(
                integration_id = %integration.id,
                status = %status,
                "sync skipped by dedup gate"
            );
            return Ok(SyncOutcome {
                integration_id: Some(integration.id),
                status,
                last_synced,
                error: None,
            });
        }

        let payload = serde_json::to_value(SyncTaskPayload {
            integration_id: integration.id.clone(),
            shop_domain: domain,
            access_token,
        })
        .map_err(|err| SyncError::Validation(format!("failed to encode payload: {err}")))?;

        if let Err(enqueue_err) = self.queue.enqueue(TaskKind::FullSync, payload).await {
            // The claim is ours; release it as failed so later triggers pass.
            if let Err(state_err) = store::mark_failed(
                &self.db,
                &integration.id,
                SyncEntity::FullSync,
                "failed to enqueue sync task",
            )
            .await
            {
                tracing::error!(
                    integration_id = %integration.id,
                    error = %state_err,
                    "failed to record enqueue failure"
                );
            }
            return Err(SyncError::Queue(enqueue_err));
        }

        tracing::info!(integration_id = %integration.id, "sync triggered");
        Ok(SyncOutcome {
            integration_id: Some(integration.id),
            status: SyncStatusReport::InProgress,
            last_synced: None,
            error: None,
        })
    }

    /// Read the current sync status for a (user, shop) pair.
    ///
    /// Reports `never_synced` when no integration or no sync-state rows
    /// exist, and `partial_sync_only` when per-entity rows exist without a
    /// `full_sync` row.
    pub async fn get_sync_status(
        &self,
        user_id: &UserId,
        shop_domain: &str,
    ) -> Result<SyncOutcome> {
        store::find_user(&self.db, user_id)
            .await?
            .ok_or_else(|| SyncError::Validation("user not found".to_owned()))?;

        let domain = normalize_domain(shop_domain);
        let shop = store::find_shop_by_domain(&self.db, &domain)
            .await?
            .ok_or_else(|| SyncError::Validation(format!("shop not found: {domain}")))?;

        let Some(integration) =
            store::find_integration_by_shop(&self.db, &shop.id, PlatformKind::Shopify).await?
        else {
            return Ok(SyncOutcome {
                integration_id: None,
                status: SyncStatusReport::NeverSynced,
                last_synced: None,
                error: None,
            });
        };

        let states = store::find_states(&self.db, &integration.id).await?;
        if states.is_empty() {
            return Ok(SyncOutcome {
                integration_id: Some(integration.id),
                status: SyncStatusReport::NeverSynced,
                last_synced: None,
                error: None,
            });
        }

        match states
            .iter()
            .find(|state| state.entity_type == SyncEntity::FullSync)
        {
            Some(full) => Ok(SyncOutcome {
                integration_id: Some(integration.id),
                status: SyncStatusReport::from(full.status),
                last_synced: full.last_synced_at,
                error: full.error_message.clone(),
            }),
            None => Ok(SyncOutcome {
                integration_id: Some(integration.id),
                status: SyncStatusReport::PartialSyncOnly,
                last_synced: None,
                error: None,
            }),
        }
    }
}
