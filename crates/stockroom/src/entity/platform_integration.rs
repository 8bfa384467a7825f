//! PlatformIntegration entity - the synchronization unit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{IntegrationId, ShopId};

use super::platform_kind::PlatformKind;

/// One integration per (shop, platform kind).
///
/// `platform_shop_id` is the external-side shop identifier; for Shopify this
/// is the normalized shop domain. Unique on (platform_shop_id, platform_kind).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platform_integrations")]
pub struct Model {
    /// Typed primary key (`int_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: IntegrationId,

    pub shop_id: ShopId,
    pub platform_kind: PlatformKind,

    /// External-side shop identifier.
    pub platform_shop_id: String,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shop::Entity",
        from = "Column::ShopId",
        to = "super::shop::Column::Id",
        on_delete = "Cascade"
    )]
    Shop,
    #[sea_orm(has_many = "super::location::Entity")]
    Locations,
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
    #[sea_orm(has_many = "super::inventory_item::Entity")]
    InventoryItems,
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    #[sea_orm(has_many = "super::sync_state::Entity")]
    SyncStates,
}

impl Related<super::shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shop.def()
    }
}

impl Related<super::sync_state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SyncStates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
