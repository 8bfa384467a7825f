//! Entity classes tracked by sync state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The entity class a sync-state row tracks.
///
/// One row exists per (integration, entity class). `full_sync` is the gate of
/// truth for orchestration; the per-entity classes back the finer-grained
/// sub-pipelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SyncEntity {
    #[sea_orm(string_value = "full_sync")]
    FullSync,
    #[sea_orm(string_value = "locations")]
    Locations,
    #[sea_orm(string_value = "products")]
    Products,
    #[sea_orm(string_value = "inventory")]
    Inventory,
    #[sea_orm(string_value = "orders")]
    Orders,
}

impl std::fmt::Display for SyncEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncEntity::FullSync => "full_sync",
            SyncEntity::Locations => "locations",
            SyncEntity::Products => "products",
            SyncEntity::Inventory => "inventory",
            SyncEntity::Orders => "orders",
        };
        f.write_str(s)
    }
}
