//! Background worker: weighted dispatch, bounded concurrency, middleware.
//!
//! Every task runs through the same envelope: a start/finish log with
//! duration, panic recovery that marks the task non-retriable, and the retry
//! policy (exponential backoff via the scheduled set, honoring the handler's
//! skip-retry sentinel).

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;

use super::broker::{DeliveredTask, RedisQueue};
use super::{Priority, Result, TaskError, TaskHandler};

/// Maximum task handlers running at once.
pub const WORKER_CONCURRENCY: usize = 10;

/// Maximum delivery attempts before a task is dropped as failed.
pub const MAX_ATTEMPTS: u32 = 5;

/// Poll interval when every queue is empty.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Backoff before re-delivering attempt `attempt` (zero-based, so the first
/// retry waits 30s). Doubles per attempt, capped at 15 minutes.
pub fn retry_backoff(attempt: u32) -> Duration {
    let base = Duration::from_secs(30);
    let capped = base.saturating_mul(2u32.saturating_pow(attempt.min(16)));
    capped.min(Duration::from_secs(15 * 60))
}

/// Weighted fair dispatch order for one poll.
///
/// Slots are laid out by weight (critical six, default three, low one); the
/// tick picks the preferred class, and the rest follow in static priority
/// order as fallback.
fn dispatch_order(tick: u64) -> [Priority; 3] {
    const SLOTS: [Priority; 10] = [
        Priority::Critical,
        Priority::Critical,
        Priority::Critical,
        Priority::Critical,
        Priority::Critical,
        Priority::Critical,
        Priority::Default,
        Priority::Default,
        Priority::Default,
        Priority::Low,
    ];
    let preferred = SLOTS[(tick % SLOTS.len() as u64) as usize];
    let mut order = [preferred; 3];
    let mut i = 1;
    for p in Priority::ALL {
        if p != preferred {
            order[i] = p;
            i += 1;
        }
    }
    order
}

/// Consumes tasks from the broker and runs them through a handler.
pub struct Worker {
    queue: RedisQueue,
    handler: Arc<dyn TaskHandler>,
    concurrency: usize,
}

impl Worker {
    pub fn new(queue: RedisQueue, handler: Arc<dyn TaskHandler>) -> Self {
        Self {
            queue,
            handler,
            concurrency: WORKER_CONCURRENCY,
        }
    }

    /// Override the handler concurrency cap.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run the dispatch loop until `shutdown` flips to true.
    ///
    /// On shutdown the loop stops popping and waits for in-flight handlers
    /// to finish; anything re-delivered later is safe because handlers are
    /// idempotent.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set: JoinSet<()> = JoinSet::new();
        let mut tick: u64 = 0;

        match self.queue.recover_processing().await {
            Ok(0) => {}
            Ok(recovered) => {
                tracing::warn!(recovered, "re-enqueued tasks abandoned by a previous worker");
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to recover processing list");
            }
        }

        tracing::info!(concurrency = self.concurrency, "worker started");

        while !*shutdown.borrow() {
            if let Err(err) = self.queue.promote_due(Utc::now()).await {
                tracing::warn!(error = %err, "failed to promote scheduled tasks");
            }

            let order = dispatch_order(tick);
            tick = tick.wrapping_add(1);

            match self.queue.pop(&order).await {
                Ok(Some(delivered)) => {
                    let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                        break;
                    };
                    let queue = self.queue.clone();
                    let handler = Arc::clone(&self.handler);
                    join_set.spawn(async move {
                        run_task(queue, handler, delivered).await;
                        drop(permit);
                    });
                }
                Ok(None) => {
                    tokio::select! {
                        _ = tokio::time::sleep(IDLE_POLL_INTERVAL) => {}
                        _ = shutdown.changed() => {}
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "queue poll failed");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }

            // Reap already-finished handlers without blocking the loop.
            while let Some(joined) = join_set.try_join_next() {
                if let Err(err) = joined {
                    tracing::error!(error = %err, "task envelope aborted");
                }
            }
        }

        tracing::info!(
            in_flight = join_set.len(),
            "worker shutting down, draining in-flight tasks"
        );
        while let Some(joined) = join_set.join_next().await {
            if let Err(err) = joined {
                tracing::error!(error = %err, "task envelope aborted during drain");
            }
        }

        Ok(())
    }
}

/// The per-task envelope: logging, panic recovery, retry policy.
async fn run_task(queue: RedisQueue, handler: Arc<dyn TaskHandler>, delivered: DeliveredTask) {
    let message = delivered.message.clone();
    let kind = message.kind.as_str();
    let task_id = message.id.clone();
    let attempt = message.attempt;
    let start = Instant::now();

    tracing::info!(task_id = %task_id, kind, attempt, "task started");

    // Handlers run in their own task so a panic is caught here instead of
    // tearing down the dispatch loop.
    let outcome = tokio::spawn(async move { handler.handle(&message).await }).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    let failure: TaskError = match outcome {
        Ok(Ok(())) => {
            tracing::info!(task_id = %task_id, kind, duration_ms, "task completed");
            finish(&queue, &delivered.raw).await;
            return;
        }
        Ok(Err(err)) => err,
        Err(join_err) => {
            // Panic recovery: record and do not retry.
            TaskError::skip(format!("panic in task handler: {join_err}"))
        }
    };

    let next_attempt = delivered.message.attempt + 1;
    if failure.skip_retry || next_attempt >= MAX_ATTEMPTS {
        tracing::error!(
            task_id = %task_id,
            kind,
            attempt,
            duration_ms,
            error = %failure,
            "task failed permanently"
        );
        finish(&queue, &delivered.raw).await;
        return;
    }

    let delay = retry_backoff(delivered.message.attempt);
    tracing::warn!(
        task_id = %task_id,
        kind,
        attempt,
        duration_ms,
        retry_in_secs = delay.as_secs(),
        error = %failure,
        "task failed, scheduling retry"
    );

    let mut retry = delivered.message.clone();
    retry.attempt = next_attempt;
    let run_at = Utc::now() + chrono::Duration::from_std(delay).unwrap_or(chrono::Duration::zero());
    if let Err(err) = queue.schedule(&retry, run_at).await {
        tracing::error!(task_id = %task_id, error = %err, "failed to schedule retry");
    }
    finish(&queue, &delivered.raw).await;
}

async fn finish(queue: &RedisQueue, raw: &str) {
    if let Err(err) = queue.ack(raw).await {
        tracing::warn!(error = %err, "failed to ack task; it may be re-delivered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(retry_backoff(0), Duration::from_secs(30));
        assert_eq!(retry_backoff(1), Duration::from_secs(60));
        assert_eq!(retry_backoff(2), Duration::from_secs(120));
        assert_eq!(retry_backoff(10), Duration::from_secs(15 * 60));
        assert_eq!(retry_backoff(u32::MAX), Duration::from_secs(15 * 60));
    }

    #[test]
    fn dispatch_order_always_covers_all_classes() {
        for tick in 0..20 {
            let order = dispatch_order(tick);
            for p in Priority::ALL {
                assert!(order.contains(&p), "tick {tick} missing {p:?}");
            }
        }
    }

    #[test]
    fn dispatch_order_is_weighted_six_three_one() {
        let mut critical = 0;
        let mut default = 0;
        let mut low = 0;
        for tick in 0..10 {
            match dispatch_order(tick)[0] {
                Priority::Critical => critical += 1,
                Priority::Default => default += 1,
                Priority::Low => low += 1,
            }
        }
        assert_eq!((critical, default, low), (6, 3, 1));
    }
}
