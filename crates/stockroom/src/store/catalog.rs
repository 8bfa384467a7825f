//! Chunked upserts and id maps for the catalog entities.
//!
//! Upsert keys follow the uniqueness rules of the schema: locations,
//! variants, and inventory items on their global `external_id`; products on
//! (integration, handle); inventory levels on (item, location). Fresh ids are
//! generated per batch, but the conflict key establishes identity, so
//! existing rows keep their ids and the id maps below resolve the surviving
//! row for foreign keys.

use std::collections::HashMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Insert, QueryFilter, QuerySelect,
};

use crate::entity::prelude::*;
use crate::id::{IntegrationId, InventoryItemId, LocationId, ProductId};

use super::UPSERT_CHUNK_SIZE;
use super::errors::Result;

async fn chunked_upsert<C, A>(conn: &C, models: Vec<A>, on_conflict: OnConflict) -> Result<u64>
where
    C: ConnectionTrait,
    A: ActiveModelTrait + Clone + Send,
    <A::Entity as EntityTrait>::Model: sea_orm::IntoActiveModel<A>,
{
    if models.is_empty() {
        return Ok(0);
    }

    let mut written = 0u64;
    for chunk in models.chunks(UPSERT_CHUNK_SIZE) {
        written += Insert::many(chunk.to_vec())
            .on_conflict(on_conflict.clone())
            .exec_without_returning(conn)
            .await?;
    }
    Ok(written)
}

/// Upsert locations on their global `external_id`.
pub async fn upsert_locations<C: ConnectionTrait>(
    conn: &C,
    models: Vec<LocationActiveModel>,
) -> Result<u64> {
    let on_conflict = OnConflict::column(LocationColumn::ExternalId)
        .update_columns([
            LocationColumn::IntegrationId,
            LocationColumn::Name,
            LocationColumn::Address,
            LocationColumn::Country,
            LocationColumn::Province,
            LocationColumn::IsActive,
            LocationColumn::UpdatedAt,
        ])
        .to_owned();
    chunked_upsert(conn, models, on_conflict).await
}

/// Map of location `external_id` to surviving row id for an integration.
pub async fn location_id_map<C: ConnectionTrait>(
    conn: &C,
    integration_id: &IntegrationId,
) -> Result<HashMap<String, LocationId>> {
    let rows: Vec<(LocationId, String)> = Location::find()
        .select_only()
        .column(LocationColumn::Id)
        .column(LocationColumn::ExternalId)
        .filter(LocationColumn::IntegrationId.eq(integration_id.clone()))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|(id, ext)| (ext, id)).collect())
}

/// Upsert products on (integration, handle) - the handle, not the external
/// id, is the stable identity.
pub async fn upsert_products<C: ConnectionTrait>(
    conn: &C,
    models: Vec<ProductActiveModel>,
) -> Result<u64> {
    let on_conflict = OnConflict::columns([
        ProductColumn::IntegrationId,
        ProductColumn::Handle,
    ])
    .update_columns([
        ProductColumn::ExternalId,
        ProductColumn::Title,
        ProductColumn::ProductType,
        ProductColumn::Status,
        ProductColumn::UpdatedAt,
    ])
    .to_owned();
    chunked_upsert(conn, models, on_conflict).await
}

/// Map of product `external_id` to surviving row id for an integration.
pub async fn product_id_map<C: ConnectionTrait>(
    conn: &C,
    integration_id: &IntegrationId,
) -> Result<HashMap<String, ProductId>> {
    let rows: Vec<(ProductId, String)> = Product::find()
        .select_only()
        .column(ProductColumn::Id)
        .column(ProductColumn::ExternalId)
        .filter(ProductColumn::IntegrationId.eq(integration_id.clone()))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|(id, ext)| (ext, id)).collect())
}

/// Upsert variants on their global `external_id`.
pub async fn upsert_variants<C: ConnectionTrait>(
    conn: &C,
    models: Vec<ProductVariantActiveModel>,
) -> Result<u64> {
    let on_conflict = OnConflict::column(ProductVariantColumn::ExternalId)
        .update_columns([
            ProductVariantColumn::ProductId,
            ProductVariantColumn::Sku,
            ProductVariantColumn::Price,
            ProductVariantColumn::InventoryItemExternalId,
            ProductVariantColumn::UpdatedAt,
        ])
        .to_owned();
    chunked_upsert(conn, models, on_conflict).await
}

/// Upsert inventory items on their global `external_id`.
pub async fn upsert_inventory_items<C: ConnectionTrait>(
    conn: &C,
    models: Vec<InventoryItemActiveModel>,
) -> Result<u64> {
    let on_conflict = OnConflict::column(InventoryItemColumn::ExternalId)
        .update_columns([
            InventoryItemColumn::IntegrationId,
            InventoryItemColumn::Sku,
            InventoryItemColumn::Tracked,
            InventoryItemColumn::Cost,
            InventoryItemColumn::UpdatedAt,
        ])
        .to_owned();
    chunked_upsert(conn, models, on_conflict).await
}

/// Map of inventory-item `external_id` to surviving row id for an integration.
pub async fn inventory_item_id_map<C: ConnectionTrait>(
    conn: &C,
    integration_id: &IntegrationId,
) -> Result<HashMap<String, InventoryItemId>> {
    let rows: Vec<(InventoryItemId, String)> = InventoryItem::find()
        .select_only()
        .column(InventoryItemColumn::Id)
        .column(InventoryItemColumn::ExternalId)
        .filter(InventoryItemColumn::IntegrationId.eq(integration_id.clone()))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|(id, ext)| (ext, id)).collect())
}

/// Upsert inventory levels on (item, location).
pub async fn upsert_inventory_levels<C: ConnectionTrait>(
    conn: &C,
    models: Vec<InventoryLevelActiveModel>,
) -> Result<u64> {
    let on_conflict = OnConflict::columns([
        InventoryLevelColumn::InventoryItemId,
        InventoryLevelColumn::LocationId,
    ])
    .update_columns([
        InventoryLevelColumn::Available,
        InventoryLevelColumn::UpdatedAt,
    ])
    .to_owned();
    chunked_upsert(conn, models, on_conflict).await
}
