//! `stockroom sync` - trigger and inspect syncs.

use std::sync::Arc;

use stockroom::config::Settings;
use stockroom::id::UserId;
use stockroom::queue::RedisQueue;
use stockroom::sync::{SyncOrchestrator, SyncRequest};

use crate::SyncAction;

pub async fn run(settings: &Settings, action: SyncAction) -> anyhow::Result<()> {
    let db = stockroom::db::connect(&settings.database_url).await?;
    let queue = Arc::new(RedisQueue::connect(&settings.redis_url).await?);
    let orchestrator = SyncOrchestrator::new(db, queue, settings.cipher()?);

    match action {
        SyncAction::Trigger {
            user_id,
            shop_domain,
            force,
        } => {
            let user_id: UserId = user_id.parse()?;
            let outcome = orchestrator
                .trigger_sync(SyncRequest {
                    user_id,
                    shop_domain,
                    force,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        SyncAction::Status {
            user_id,
            shop_domain,
        } => {
            let user_id: UserId = user_id.parse()?;
            let outcome = orchestrator.get_sync_status(&user_id, &shop_domain).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
