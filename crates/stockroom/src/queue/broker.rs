//! Redis-backed queue broker.
//!
//! Layout in Redis:
//! - one list per priority class (`stockroom:queue:<priority>`), pushed at
//!   the head and popped from the tail, so each class is FIFO;
//! - a processing list per worker pop (`stockroom:queue:processing`), giving
//!   at-least-once delivery: a message is moved there atomically on pop and
//!   removed only after the handler finishes;
//! - a scheduled sorted set (`stockroom:queue:scheduled`) holding retry
//!   messages keyed by their due time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;

use super::{Priority, Result, TaskHandle, TaskKind, TaskMessage, TaskQueue};

const KEY_PREFIX: &str = "stockroom:queue";

fn queue_key(priority: Priority) -> String {
    format!("{KEY_PREFIX}:{}", priority.as_str())
}

fn processing_key() -> String {
    format!("{KEY_PREFIX}:processing")
}

fn scheduled_key() -> String {
    format!("{KEY_PREFIX}:scheduled")
}

/// A message popped from the queue, paired with its raw wire form so it can
/// be acknowledged (removed from the processing list) byte-for-byte.
#[derive(Debug, Clone)]
pub(crate) struct DeliveredTask {
    pub message: TaskMessage,
    pub raw: String,
}

/// Redis implementation of the queue seam.
///
/// Cheap to clone; the underlying connection manager multiplexes and
/// reconnects on its own.
#[derive(Clone)]
pub struct RedisQueue {
    conn: ConnectionManager,
}

impl RedisQueue {
    /// Connect to the broker at `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    async fn push(&self, message: &TaskMessage) -> Result<()> {
        let raw = serde_json::to_string(message)?;
        let mut conn = self.conn.clone();
        redis::cmd("LPUSH")
            .arg(queue_key(message.kind.priority()))
            .arg(raw)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    /// Pop one message, trying the priority classes in the given order.
    ///
    /// The pop is an `LMOVE` into the processing list, so a crashed worker
    /// leaves the message recoverable rather than lost.
    pub(crate) async fn pop(&self, order: &[Priority]) -> Result<Option<DeliveredTask>> {
        let mut conn = self.conn.clone();
        for priority in order {
            let raw: Option<String> = redis::cmd("LMOVE")
                .arg(queue_key(*priority))
                .arg(processing_key())
                .arg("RIGHT")
                .arg("LEFT")
                .query_async(&mut conn)
                .await?;

            if let Some(raw) = raw {
                match serde_json::from_str::<TaskMessage>(&raw) {
                    Ok(message) => return Ok(Some(DeliveredTask { message, raw })),
                    Err(err) => {
                        // Unparseable garbage would wedge the queue if left
                        // in processing; drop it and keep polling.
                        tracing::error!(error = %err, "discarding undecodable task message");
                        self.ack(&raw).await?;
                    }
                }
            }
        }
        Ok(None)
    }

    /// Acknowledge a delivered message, removing it from the processing list.
    pub(crate) async fn ack(&self, raw: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("LREM")
            .arg(processing_key())
            .arg(1)
            .arg(raw)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    /// Schedule a message for re-delivery at `run_at`.
    pub(crate) async fn schedule(&self, message: &TaskMessage, run_at: DateTime<Utc>) -> Result<()> {
        let raw = serde_json::to_string(message)?;
        let mut conn = self.conn.clone();
        redis::cmd("ZADD")
            .arg(scheduled_key())
            .arg(run_at.timestamp_millis())
            .arg(raw)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    /// Re-enqueue everything left in the processing list.
    ///
    /// Run at worker startup: entries there belong to a previous process
    /// that died mid-task. At-least-once delivery makes the occasional
    /// double delivery safe; handlers are idempotent.
    pub(crate) async fn recover_processing(&self) -> Result<usize> {
        let mut conn = self.conn.clone();
        let mut recovered = 0usize;
        loop {
            let raw: Option<String> = redis::cmd("RPOP")
                .arg(processing_key())
                .query_async(&mut conn)
                .await?;
            let Some(raw) = raw else { break };

            let priority = serde_json::from_str::<TaskMessage>(&raw)
                .map(|m| m.kind.priority())
                .unwrap_or(Priority::Default);
            redis::cmd("LPUSH")
                .arg(queue_key(priority))
                .arg(&raw)
                .query_async::<()>(&mut conn)
                .await?;
            recovered += 1;
        }
        Ok(recovered)
    }

    /// Move due scheduled messages back onto their priority lists.
    ///
    /// `ZREM` before the push arbitrates between concurrent workers: only the
    /// one that actually removed the member re-enqueues it.
    pub(crate) async fn promote_due(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn.clone();
        let due: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(scheduled_key())
            .arg("-inf")
            .arg(now.timestamp_millis())
            .arg("LIMIT")
            .arg(0)
            .arg(100)
            .query_async(&mut conn)
            .await?;

        let mut promoted = 0usize;
        for raw in due {
            let removed: u32 = redis::cmd("ZREM")
                .arg(scheduled_key())
                .arg(&raw)
                .query_async(&mut conn)
                .await?;
            if removed == 0 {
                continue;
            }

            let priority = serde_json::from_str::<TaskMessage>(&raw)
                .map(|m| m.kind.priority())
                .unwrap_or(Priority::Default);
            redis::cmd("LPUSH")
                .arg(queue_key(priority))
                .arg(&raw)
                .query_async::<()>(&mut conn)
                .await?;
            promoted += 1;
        }
        Ok(promoted)
    }
}

#[async_trait]
impl TaskQueue for RedisQueue {
    async fn enqueue(&self, kind: TaskKind, payload: serde_json::Value) -> Result<TaskHandle> {
        let message = TaskMessage::new(kind, payload);
        self.push(&message).await?;
        tracing::debug!(task_id = %message.id, kind = kind.as_str(), "enqueued task");
        Ok(TaskHandle { id: message.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_priority() {
        assert_eq!(queue_key(Priority::Critical), "stockroom:queue:critical");
        assert_eq!(queue_key(Priority::Default), "stockroom:queue:default");
        assert_eq!(queue_key(Priority::Low), "stockroom:queue:low");
        assert_eq!(processing_key(), "stockroom:queue:processing");
        assert_eq!(scheduled_key(), "stockroom:queue:scheduled");
    }
}
