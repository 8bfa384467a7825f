//! The inventory sync core: orchestration and the ingestion pipeline.

mod error;
mod handler;
mod normalize;
mod orchestrator;
mod pipeline;
mod types;

pub use error::{Result, SyncError};
pub use handler::SyncTaskHandler;
pub use normalize::{
    LevelDraft, LineItemDraft, VariantDraft, collect_inventory_item_ids, compose_address,
    level_model, normalize_inventory_items, normalize_inventory_levels, normalize_locations,
    normalize_orders, normalize_products, parse_decimal,
};
pub use orchestrator::SyncOrchestrator;
pub use pipeline::{
    FetchedData, INVENTORY_ITEM_BATCH_SIZE, ORDER_WINDOW_DAYS, PAGE_LIMIT, fetch_all,
    run_full_sync, run_locations_sync, run_orders_sync, run_products_sync,
};
pub use types::{SyncOutcome, SyncRequest, SyncStats, SyncStatusReport};
