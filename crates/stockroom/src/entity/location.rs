//! Location entity - a stock location on the external platform.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{IntegrationId, LocationId};

/// Location model.
///
/// `external_id` is globally unique: the same physical location is never
/// duplicated, even if seen through multiple integrations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    /// Typed primary key (`loc_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: LocationId,

    pub integration_id: IntegrationId,

    /// Platform-assigned id, rendered as a decimal string.
    #[sea_orm(unique)]
    pub external_id: String,

    pub name: String,

    /// Composed street address (`address1, address2, city`, empty parts omitted).
    pub address: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

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
