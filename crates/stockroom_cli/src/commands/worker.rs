//! `stockroom worker` - run the background sync worker.

use std::sync::Arc;

use stockroom::config::Settings;
use stockroom::queue::{RedisQueue, Worker};
use stockroom::sync::SyncTaskHandler;

use crate::shutdown;

pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let db = stockroom::db::connect(&settings.database_url).await?;
    let queue = RedisQueue::connect(&settings.redis_url).await?;
    let handler = Arc::new(SyncTaskHandler::new(db, settings.cipher()?));

    let worker = Worker::new(queue, handler);
    worker.run(shutdown::shutdown_signal()).await?;

    Ok(())
}
