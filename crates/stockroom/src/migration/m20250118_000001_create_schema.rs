//! Initial migration to create the stockroom schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_users(manager).await?;
        self.create_shops(manager).await?;
        self.create_platform_credentials(manager).await?;
        self.create_platform_integrations(manager).await?;
        self.create_locations(manager).await?;
        self.create_products(manager).await?;
        self.create_product_variants(manager).await?;
        self.create_inventory_items(manager).await?;
        self.create_inventory_levels(manager).await?;
        self.create_orders(manager).await?;
        self.create_order_line_items(manager).await?;
        self.create_sync_states(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order.
        for table in [
            SyncStates::Table.into_iden(),
            OrderLineItems::Table.into_iden(),
            Orders::Table.into_iden(),
            InventoryLevels::Table.into_iden(),
            InventoryItems::Table.into_iden(),
            ProductVariants::Table.into_iden(),
            Products::Table.into_iden(),
            Locations::Table.into_iden(),
            PlatformIntegrations::Table.into_iden(),
            PlatformCredentials::Table.into_iden(),
            Shops::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

impl Migration {
    async fn create_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_shops(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shops::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shops::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Shops::Domain).string().not_null())
                    .col(ColumnDef::new(Shops::DisplayName).string().null())
                    .col(ColumnDef::new(Shops::Timezone).string().null())
                    .col(ColumnDef::new(Shops::Currency).string().null())
                    .col(
                        ColumnDef::new(Shops::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shops::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shops_domain")
                    .table(Shops::Table)
                    .col(Shops::Domain)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_platform_credentials(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlatformCredentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlatformCredentials::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlatformCredentials::UserId).string().not_null())
                    .col(ColumnDef::new(PlatformCredentials::ShopId).string().not_null())
                    .col(
                        ColumnDef::new(PlatformCredentials::AccessToken)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PlatformCredentials::Scope).string().null())
                    .col(
                        ColumnDef::new(PlatformCredentials::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PlatformCredentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlatformCredentials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_platform_credentials_user")
                            .from(PlatformCredentials::Table, PlatformCredentials::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_platform_credentials_shop")
                            .from(PlatformCredentials::Table, PlatformCredentials::ShopId)
                            .to(Shops::Table, Shops::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_platform_credentials_user_shop")
                    .table(PlatformCredentials::Table)
                    .col(PlatformCredentials::UserId)
                    .col(PlatformCredentials::ShopId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_platform_integrations(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlatformIntegrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlatformIntegrations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlatformIntegrations::ShopId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlatformIntegrations::PlatformKind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlatformIntegrations::PlatformShopId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlatformIntegrations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PlatformIntegrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlatformIntegrations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_platform_integrations_shop")
                            .from(PlatformIntegrations::Table, PlatformIntegrations::ShopId)
                            .to(Shops::Table, Shops::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_platform_integrations_shop_kind")
                    .table(PlatformIntegrations::Table)
                    .col(PlatformIntegrations::PlatformShopId)
                    .col(PlatformIntegrations::PlatformKind)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_locations(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::IntegrationId).string().not_null())
                    .col(ColumnDef::new(Locations::ExternalId).string().not_null())
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .col(ColumnDef::new(Locations::Address).string().null())
                    .col(ColumnDef::new(Locations::Country).string().null())
                    .col(ColumnDef::new(Locations::Province).string().null())
                    .col(
                        ColumnDef::new(Locations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Locations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Locations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_integration")
                            .from(Locations::Table, Locations::IntegrationId)
                            .to(PlatformIntegrations::Table, PlatformIntegrations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_locations_external_id")
                    .table(Locations::Table)
                    .col(Locations::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_products(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::IntegrationId).string().not_null())
                    .col(ColumnDef::new(Products::ExternalId).string().not_null())
                    .col(ColumnDef::new(Products::Title).string().not_null())
                    .col(ColumnDef::new(Products::Handle).string().not_null())
                    .col(ColumnDef::new(Products::ProductType).string().null())
                    .col(ColumnDef::new(Products::Status).string().not_null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_integration")
                            .from(Products::Table, Products::IntegrationId)
                            .to(PlatformIntegrations::Table, PlatformIntegrations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The handle, not the external id, is the stable product identity.
        manager
            .create_index(
                Index::create()
                    .name("idx_products_integration_handle")
                    .table(Products::Table)
                    .col(Products::IntegrationId)
                    .col(Products::Handle)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_external_id")
                    .table(Products::Table)
                    .col(Products::ExternalId)
                    .to_owned(),
            )
            .await
    }

    async fn create_product_variants(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductVariants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductVariants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductVariants::ProductId).string().not_null())
                    .col(ColumnDef::new(ProductVariants::ExternalId).string().not_null())
                    .col(ColumnDef::new(ProductVariants::Sku).string().null())
                    .col(ColumnDef::new(ProductVariants::Price).decimal_len(19, 4).null())
                    .col(
                        ColumnDef::new(ProductVariants::InventoryItemExternalId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProductVariants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductVariants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_variants_product")
                            .from(ProductVariants::Table, ProductVariants::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_variants_external_id")
                    .table(ProductVariants::Table)
                    .col(ProductVariants::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_inventory_items(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryItems::IntegrationId).string().not_null())
                    .col(ColumnDef::new(InventoryItems::ExternalId).string().not_null())
                    .col(ColumnDef::new(InventoryItems::Sku).string().null())
                    .col(
                        ColumnDef::new(InventoryItems::Tracked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(InventoryItems::Cost).decimal_len(19, 4).null())
                    .col(
                        ColumnDef::new(InventoryItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_items_integration")
                            .from(InventoryItems::Table, InventoryItems::IntegrationId)
                            .to(PlatformIntegrations::Table, PlatformIntegrations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_items_external_id")
                    .table(InventoryItems::Table)
                    .col(InventoryItems::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_inventory_levels(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryLevels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryLevels::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InventoryLevels::InventoryItemId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryLevels::LocationId).string().not_null())
                    .col(
                        ColumnDef::new(InventoryLevels::Available)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InventoryLevels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryLevels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_levels_item")
                            .from(InventoryLevels::Table, InventoryLevels::InventoryItemId)
                            .to(InventoryItems::Table, InventoryItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_levels_location")
                            .from(InventoryLevels::Table, InventoryLevels::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_levels_item_location")
                    .table(InventoryLevels::Table)
                    .col(InventoryLevels::InventoryItemId)
                    .col(InventoryLevels::LocationId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_orders(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Orders::IntegrationId).string().not_null())
                    .col(ColumnDef::new(Orders::ExternalId).string().not_null())
                    .col(ColumnDef::new(Orders::FinancialStatus).string().not_null())
                    .col(ColumnDef::new(Orders::FulfillmentStatus).string().null())
                    .col(ColumnDef::new(Orders::TotalPrice).decimal_len(19, 4).null())
                    .col(ColumnDef::new(Orders::Currency).string().null())
                    .col(
                        ColumnDef::new(Orders::PlacedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::CancelledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_integration")
                            .from(Orders::Table, Orders::IntegrationId)
                            .to(PlatformIntegrations::Table, PlatformIntegrations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_external_id")
                    .table(Orders::Table)
                    .col(Orders::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_order_line_items(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderLineItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderLineItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderLineItems::OrderId).string().not_null())
                    .col(ColumnDef::new(OrderLineItems::ExternalId).string().not_null())
                    .col(ColumnDef::new(OrderLineItems::ProductId).string().null())
                    .col(
                        ColumnDef::new(OrderLineItems::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(OrderLineItems::Price).decimal_len(19, 4).null())
                    .col(
                        ColumnDef::new(OrderLineItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderLineItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_line_items_order")
                            .from(OrderLineItems::Table, OrderLineItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_line_items_product")
                            .from(OrderLineItems::Table, OrderLineItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_line_items_order_external")
                    .table(OrderLineItems::Table)
                    .col(OrderLineItems::OrderId)
                    .col(OrderLineItems::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn create_sync_states(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncStates::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncStates::IntegrationId).string().not_null())
                    .col(ColumnDef::new(SyncStates::EntityType).string().not_null())
                    .col(ColumnDef::new(SyncStates::Status).string().not_null())
                    .col(
                        ColumnDef::new(SyncStates::LastSyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(SyncStates::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(SyncStates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SyncStates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sync_states_integration")
                            .from(SyncStates::Table, SyncStates::IntegrationId)
                            .to(PlatformIntegrations::Table, PlatformIntegrations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_states_integration_entity")
                    .table(SyncStates::Table)
                    .col(SyncStates::IntegrationId)
                    .col(SyncStates::EntityType)
                    .unique()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Shops {
    Table,
    Id,
    Domain,
    DisplayName,
    Timezone,
    Currency,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlatformCredentials {
    Table,
    Id,
    UserId,
    ShopId,
    AccessToken,
    Scope,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlatformIntegrations {
    Table,
    Id,
    ShopId,
    PlatformKind,
    PlatformShopId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    IntegrationId,
    ExternalId,
    Name,
    Address,
    Country,
    Province,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    IntegrationId,
    ExternalId,
    Title,
    Handle,
    ProductType,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductVariants {
    Table,
    Id,
    ProductId,
    ExternalId,
    Sku,
    Price,
    InventoryItemExternalId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
    IntegrationId,
    ExternalId,
    Sku,
    Tracked,
    Cost,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InventoryLevels {
    Table,
    Id,
    InventoryItemId,
    LocationId,
    Available,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    IntegrationId,
    ExternalId,
    FinancialStatus,
    FulfillmentStatus,
    TotalPrice,
    Currency,
    PlacedAt,
    CancelledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderLineItems {
    Table,
    Id,
    OrderId,
    ExternalId,
    ProductId,
    Quantity,
    Price,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SyncStates {
    Table,
    Id,
    IntegrationId,
    EntityType,
    Status,
    LastSyncedAt,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}
