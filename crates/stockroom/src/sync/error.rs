//! Sync error taxonomy.

use thiserror::Error;

use crate::queue::QueueError;
use crate::shopify::ShopifyError;
use crate::store::StoreError;

/// Errors raised by the orchestrator and the ingestion pipeline.
///
/// Each layer wraps the underlying error with a short context string; only
/// the outermost handler turns one of these into a user-visible message.
/// Tokens and SQL never appear in the rendered text.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Bad input: missing user, shop, or credential; malformed id.
    /// Surfaced to the caller; no state mutation.
    #[error("{0}")]
    Validation(String),

    /// Credential absent or empty, or decryption failed. Sync not started.
    #[error("{0}")]
    Auth(String),

    /// The platform answered with an error or the connection failed.
    #[error("{context}: {source}")]
    Upstream {
        context: String,
        #[source]
        source: ShopifyError,
    },

    /// Enqueue failed; the trigger flips the claimed state to `failed`.
    #[error("failed to enqueue sync task: {0}")]
    Queue(#[from] QueueError),

    /// Database read or write failed; in a worker the transaction rolls back.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl SyncError {
    /// Wrap an upstream platform error with a short context string.
    pub fn upstream(context: impl Into<String>, source: ShopifyError) -> Self {
        Self::Upstream {
            context: context.into(),
            source,
        }
    }

    /// Whether a worker should let the queue retry this failure.
    ///
    /// Validation and auth failures are deterministic and never retried;
    /// upstream, queue, and persistence failures are assumed transient.
    pub fn is_retriable(&self) -> bool {
        match self {
            SyncError::Validation(_) | SyncError::Auth(_) => false,
            SyncError::Upstream { .. } | SyncError::Queue(_) | SyncError::Persistence(_) => true,
        }
    }
}

impl From<sea_orm::DbErr> for SyncError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Persistence(StoreError::Database(err))
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_carry_context_and_status() {
        let err = SyncError::upstream(
            "failed to fetch products",
            ShopifyError::Api {
                status: 500,
                message: "Internal Server Error".to_owned(),
            },
        );
        let rendered = err.to_string();
        assert!(rendered.contains("failed to fetch products"));
        assert!(rendered.contains("500"));
        assert!(err.is_retriable());
    }

    #[test]
    fn validation_and_auth_are_not_retriable() {
        assert!(!SyncError::Validation("user not found".into()).is_retriable());
        assert!(!SyncError::Auth("no access token".into()).is_retriable());
    }
}
