//! InventoryItem entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{IntegrationId, InventoryItemId};

/// Inventory item model, globally unique on `external_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    /// Typed primary key (`inv_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: InventoryItemId,

    pub integration_id: IntegrationId,

    /// Platform-assigned id, rendered as a decimal string.
    #[sea_orm(unique)]
    pub external_id: String,

    pub sku: Option<String>,

    /// Whether the platform tracks quantity for this item.
    #[sea_orm(default_value = false)]
    pub tracked: bool,

    /// Unit cost. Unset when the platform value fails to parse.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub cost: Option<Decimal>,

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
    #[sea_orm(has_many = "super::inventory_level::Entity")]
    InventoryLevels,
}

impl Related<super::platform_integration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformIntegration.def()
    }
}

impl Related<super::inventory_level::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryLevels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
