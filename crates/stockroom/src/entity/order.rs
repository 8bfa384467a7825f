//! Order entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{IntegrationId, OrderId};

use super::financial_status::FinancialStatus;
use super::fulfillment_status::FulfillmentStatus;

/// Order model, globally unique on `external_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Typed primary key (`ord_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: OrderId,

    pub integration_id: IntegrationId,

    /// Platform-assigned id, rendered as a decimal string.
    #[sea_orm(unique)]
    pub external_id: String,

    pub financial_status: FinancialStatus,

    /// Nullable by contract: unfulfilled orders report no status.
    pub fulfillment_status: Option<FulfillmentStatus>,

    /// Order total. Unset when the platform value fails to parse.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub total_price: Option<Decimal>,

    pub currency: Option<String>,

    /// When the order was placed on the platform.
    pub placed_at: DateTimeUtc,

    pub cancelled_at: Option<DateTimeUtc>,

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
    #[sea_orm(has_many = "super::order_line_item::Entity")]
    OrderLineItems,
}

impl Related<super::platform_integration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformIntegration.def()
    }
}

impl Related<super::order_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
