//! SyncState entity - the orchestration gate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{IntegrationId, SyncStateId};

use super::sync_entity::SyncEntity;
use super::sync_status::SyncStatus;

/// One row per (integration, entity class), mutated in place.
///
/// The `full_sync` row is the gate of truth for orchestration: the dedup gate
/// reads it and the in-progress claim is a conditional upsert against it.
/// `updated_at` doubles as the staleness clock for abandoned `in_progress`
/// rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_states")]
pub struct Model {
    /// Typed primary key (`syc_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: SyncStateId,

    pub integration_id: IntegrationId,
    pub entity_type: SyncEntity,
    pub status: SyncStatus,

    /// Completion time of the most recent successful run. Non-null and
    /// monotonically non-decreasing once a sync has completed.
    pub last_synced_at: Option<DateTimeUtc>,

    /// Wrapped error message of the most recent failure.
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::platform_integration::Entity",
        from = "Column::IntegrationId",
        to = "super::platform_integration::Column::Id",
        on_delete = "Cascade"
    )]
    PlatformIntegration,
}

impl Related<super::platform_integration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformIntegration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
