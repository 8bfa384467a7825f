//! Query and upsert layer over the normalized schema.
//!
//! Every write here is an upsert keyed on the entity's uniqueness rule, so
//! re-running a sync against unchanged data is a no-op apart from
//! `updated_at`. Functions are generic over [`ConnectionTrait`] and work the
//! same on a pooled connection or inside a transaction.

mod accounts;
mod catalog;
mod errors;
mod integrations;
mod orders;
mod sync_states;

pub use accounts::{
    find_credential, find_credential_for_shop, find_shop_by_domain, find_user,
    update_shop_metadata, upsert_credential,
};
pub use catalog::{
    inventory_item_id_map, location_id_map, product_id_map, upsert_inventory_items,
    upsert_inventory_levels, upsert_locations, upsert_products, upsert_variants,
};
pub use errors::{Result, StoreError};
pub use integrations::{find_integration, find_integration_by_shop, get_or_create_integration};
pub use orders::{order_id_map, upsert_line_items, upsert_orders};
pub use sync_states::{
    claim_in_progress, find_states, find_sync_state, mark_completed, mark_failed,
};

/// Rows written per statement within an entity class.
pub const UPSERT_CHUNK_SIZE: usize = 250;
