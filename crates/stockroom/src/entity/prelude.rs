//! Common re-exports for convenient entity usage.

pub use super::financial_status::FinancialStatus;
pub use super::fulfillment_status::FulfillmentStatus;
pub use super::inventory_item::{
    ActiveModel as InventoryItemActiveModel, Column as InventoryItemColumn,
    Entity as InventoryItem, Model as InventoryItemModel,
};
pub use super::inventory_level::{
    ActiveModel as InventoryLevelActiveModel, Column as InventoryLevelColumn,
    Entity as InventoryLevel, Model as InventoryLevelModel,
};
pub use super::location::{
    ActiveModel as LocationActiveModel, Column as LocationColumn, Entity as Location,
    Model as LocationModel,
};
pub use super::order::{
    ActiveModel as OrderActiveModel, Column as OrderColumn, Entity as Order, Model as OrderModel,
};
pub use super::order_line_item::{
    ActiveModel as OrderLineItemActiveModel, Column as OrderLineItemColumn,
    Entity as OrderLineItem, Model as OrderLineItemModel,
};
pub use super::platform_credential::{
    ActiveModel as PlatformCredentialActiveModel, Column as PlatformCredentialColumn,
    Entity as PlatformCredential, Model as PlatformCredentialModel,
};
pub use super::platform_integration::{
    ActiveModel as PlatformIntegrationActiveModel, Column as PlatformIntegrationColumn,
    Entity as PlatformIntegration, Model as PlatformIntegrationModel,
};
pub use super::platform_kind::PlatformKind;
pub use super::product::{
    ActiveModel as ProductActiveModel, Column as ProductColumn, Entity as Product,
    Model as ProductModel,
};
pub use super::product_status::ProductStatus;
pub use super::product_variant::{
    ActiveModel as ProductVariantActiveModel, Column as ProductVariantColumn,
    Entity as ProductVariant, Model as ProductVariantModel,
};
pub use super::shop::{
    ActiveModel as ShopActiveModel, Column as ShopColumn, Entity as Shop, Model as ShopModel,
};
pub use super::sync_entity::SyncEntity;
pub use super::sync_state::{
    ActiveModel as SyncStateActiveModel, Column as SyncStateColumn, Entity as SyncState,
    Model as SyncStateModel,
};
pub use super::sync_status::SyncStatus;
pub use super::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
};
