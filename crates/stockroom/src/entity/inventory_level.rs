//! InventoryLevel entity - stock on hand per (item, location).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{InventoryItemId, InventoryLevelId, LocationId};

/// Inventory level model, unique on (inventory_item, location).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_levels")]
pub struct Model {
    /// Typed primary key (`ivl_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: InventoryLevelId,

    pub inventory_item_id: InventoryItemId,
    pub location_id: LocationId,

    /// Units available at this location.
    pub available: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::InventoryItemId",
        to = "super::inventory_item::Column::Id",
        on_delete = "Cascade"
    )]
    InventoryItem,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "Cascade"
    )]
    Location,
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItem.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
