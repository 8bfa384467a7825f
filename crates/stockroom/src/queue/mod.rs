//! Durable task queue.
//!
//! The core consumes the queue through the narrow [`TaskQueue`] seam:
//! at-least-once delivery of JSON payloads, FIFO per priority class. The
//! Redis implementation lives in [`RedisQueue`]; tests substitute in-memory
//! doubles. Background execution is the [`worker`] module.

mod broker;
mod worker;

pub use broker::RedisQueue;
pub use worker::{MAX_ATTEMPTS, WORKER_CONCURRENCY, Worker, retry_backoff};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::IntegrationId;

/// Errors from queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Broker-level failure (connect, command).
    #[error("queue broker error: {0}")]
    Broker(#[from] redis::RedisError),

    /// A payload failed to encode or decode.
    #[error("queue payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;

/// Priority classes with weighted fair dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Default,
    Low,
}

impl Priority {
    /// All classes, highest first.
    pub const ALL: [Priority; 3] = [Priority::Critical, Priority::Default, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Default => "default",
            Priority::Low => "low",
        }
    }

    /// Dispatch weight (critical:default:low = 6:3:1).
    pub fn weight(self) -> u32 {
        match self {
            Priority::Critical => 6,
            Priority::Default => 3,
            Priority::Low => 1,
        }
    }
}

/// The kinds of background work the core dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Full sync covering all entity classes for one integration.
    #[serde(rename = "sync.full")]
    FullSync,
    /// Sub-pipeline: locations only.
    #[serde(rename = "sync.locations")]
    LocationsSync,
    /// Sub-pipeline: products, variants, inventory.
    #[serde(rename = "sync.products")]
    ProductsSync,
    /// Sub-pipeline: orders and line items.
    #[serde(rename = "sync.orders")]
    OrdersSync,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::FullSync => "sync.full",
            TaskKind::LocationsSync => "sync.locations",
            TaskKind::ProductsSync => "sync.products",
            TaskKind::OrdersSync => "sync.orders",
        }
    }

    /// Priority class this kind is enqueued under.
    pub fn priority(self) -> Priority {
        match self {
            TaskKind::FullSync => Priority::Default,
            TaskKind::LocationsSync | TaskKind::ProductsSync | TaskKind::OrdersSync => {
                Priority::Low
            }
        }
    }
}

/// Payload shared by all sync task kinds.
///
/// `access_token` is the decrypted token; an empty string tells the worker to
/// re-resolve the stored credential instead. Payloads are never logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncTaskPayload {
    pub integration_id: IntegrationId,
    pub shop_domain: String,
    #[serde(default)]
    pub access_token: String,
}

/// A task message as carried on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMessage {
    /// Unique message id.
    pub id: String,
    pub kind: TaskKind,
    pub payload: serde_json::Value,
    /// Zero-based delivery attempt; bumped on each retry.
    #[serde(default)]
    pub attempt: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl TaskMessage {
    /// Build a fresh first-attempt message.
    pub fn new(kind: TaskKind, payload: serde_json::Value) -> Self {
        Self {
            id: xid::new().to_string(),
            kind,
            payload,
            attempt: 0,
            enqueued_at: Utc::now(),
        }
    }

    /// Decode the payload into its typed form.
    pub fn sync_payload(&self) -> Result<SyncTaskPayload> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

/// Handle returned from a successful enqueue.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub id: String,
}

/// The enqueue seam consumed by the orchestrator.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Enqueue a task for background execution. At-least-once delivery.
    async fn enqueue(&self, kind: TaskKind, payload: serde_json::Value) -> Result<TaskHandle>;
}

/// Error returned by task handlers.
///
/// `skip_retry` is the sentinel that tells the worker not to re-deliver;
/// everything else is retried with backoff up to [`MAX_ATTEMPTS`].
#[derive(Debug)]
pub struct TaskError {
    pub message: String,
    pub skip_retry: bool,
}

impl TaskError {
    /// A retriable failure.
    pub fn retry(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            skip_retry: false,
        }
    }

    /// A permanent failure the queue must not re-deliver.
    pub fn skip(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            skip_retry: true,
        }
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TaskError {}

/// A task handler executed by the worker.
#[async_trait]
pub trait TaskHandler: Send + Sync + 'static {
    async fn handle(&self, task: &TaskMessage) -> std::result::Result<(), TaskError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IntegrationId;

    #[test]
    fn task_kind_round_trips_through_wire_names() {
        for kind in [
            TaskKind::FullSync,
            TaskKind::LocationsSync,
            TaskKind::ProductsSync,
            TaskKind::OrdersSync,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: TaskKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn priorities_weight_six_three_one() {
        assert_eq!(Priority::Critical.weight(), 6);
        assert_eq!(Priority::Default.weight(), 3);
        assert_eq!(Priority::Low.weight(), 1);
    }

    #[test]
    fn full_sync_payload_wire_shape() {
        let payload = SyncTaskPayload {
            integration_id: IntegrationId::generate(),
            shop_domain: "demo.myshopify.com".to_owned(),
            access_token: "shpat_example".to_owned(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("integration_id").is_some());
        assert_eq!(value["shop_domain"], "demo.myshopify.com");
        assert_eq!(value["access_token"], "shpat_example");

        let message = TaskMessage::new(TaskKind::FullSync, value);
        let decoded = message.sync_payload().unwrap();
        assert_eq!(decoded.shop_domain, "demo.myshopify.com");
    }

    #[test]
    fn payload_without_token_decodes_to_empty() {
        let value = serde_json::json!({
            "integration_id": IntegrationId::generate(),
            "shop_domain": "demo.myshopify.com",
        });
        let message = TaskMessage::new(TaskKind::FullSync, value);
        assert_eq!(message.sync_payload().unwrap().access_token, "");
    }

    #[test]
    fn task_error_sentinels() {
        assert!(!TaskError::retry("transient").skip_retry);
        assert!(TaskError::skip("permanent").skip_retry);
    }
}
