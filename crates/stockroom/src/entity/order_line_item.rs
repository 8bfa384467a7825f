//! OrderLineItem entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{LineItemId, OrderId, ProductId};

/// Line item model, unique on (order, external_id).
///
/// `product_id` is nullable: line items can reference products that were
/// deleted upstream or never synced.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_line_items")]
pub struct Model {
    /// Typed primary key (`oli_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: LineItemId,

    pub order_id: OrderId,

    /// Platform-assigned id, rendered as a decimal string.
    pub external_id: String,

    pub product_id: Option<ProductId>,

    pub quantity: i32,

    /// Unit price. Unset when the platform value fails to parse.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub price: Option<Decimal>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
