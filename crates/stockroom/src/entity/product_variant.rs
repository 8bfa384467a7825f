//! ProductVariant entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{ProductId, VariantId};

/// Variant model, globally unique on `external_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_variants")]
pub struct Model {
    /// Typed primary key (`var_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: VariantId,

    pub product_id: ProductId,

    /// Platform-assigned id, rendered as a decimal string.
    #[sea_orm(unique)]
    pub external_id: String,

    pub sku: Option<String>,

    /// Unit price. Unset when the platform value fails to parse.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub price: Option<Decimal>,

    /// Platform id of the backing inventory item, when tracked.
    pub inventory_item_external_id: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
