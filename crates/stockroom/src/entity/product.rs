//! Product entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{IntegrationId, ProductId};

use super::product_status::ProductStatus;

/// Product model.
///
/// Unique on (integration, handle): the platform's handle is the stable
/// identity products are upserted against, not the numeric external id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Typed primary key (`prd_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ProductId,

    pub integration_id: IntegrationId,

    /// Platform-assigned id, rendered as a decimal string.
    pub external_id: String,

    pub title: String,

    /// URL-safe handle; the upsert key within an integration.
    pub handle: String,

    pub product_type: Option<String>,
    pub status: ProductStatus,

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
    #[sea_orm(has_many = "super::product_variant::Entity")]
    ProductVariants,
    #[sea_orm(has_many = "super::order_line_item::Entity")]
    OrderLineItems,
}

impl Related<super::platform_integration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformIntegration.def()
    }
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductVariants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
