//! The ingestion pipeline: fetch, normalize, upsert, finalize.
//!
//! One full sync runs in four phases. The fetch phase paginates the platform
//! API sequentially and accumulates raw records in memory - it can take
//! minutes, so it runs outside any transaction. Normalization and the chunked
//! upserts run inside a single transaction, ordered to satisfy foreign keys
//! (locations, products, variants, inventory items, levels, orders, line
//! items), and the `full_sync` state finalizes to `completed` in that same
//! transaction. Any failure rolls the write phase back; the caller records
//! `failed` separately.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::entity::prelude::*;
use crate::id::IntegrationId;
use crate::shopify::{
    PlatformApi, ShopInfo, ShopifyInventoryItem, ShopifyInventoryLevel, ShopifyLocation,
    ShopifyOrder, ShopifyProduct,
};
use crate::store;

use super::error::{Result, SyncError};
use super::normalize;
use super::types::SyncStats;

/// Records requested per page.
pub const PAGE_LIMIT: u32 = 250;

/// Inventory item ids fetched per request.
pub const INVENTORY_ITEM_BATCH_SIZE: usize = 100;

/// Orders are fetched back this far from the time of the sync.
pub const ORDER_WINDOW_DAYS: i64 = 30;

/// Everything the fetch phase accumulated for one integration.
#[derive(Debug, Default)]
pub struct FetchedData {
    pub shop: Option<ShopInfo>,
    pub locations: Vec<ShopifyLocation>,
    pub products: Vec<ShopifyProduct>,
    pub inventory_items: Vec<ShopifyInventoryItem>,
    pub inventory_levels: Vec<ShopifyInventoryLevel>,
    pub orders: Vec<ShopifyOrder>,
}

async fn fetch_locations(api: &dyn PlatformApi) -> Result<Vec<ShopifyLocation>> {
    let mut out = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = api
            .get_locations(PAGE_LIMIT, cursor.as_deref())
            .await
            .map_err(|e| SyncError::upstream("failed to fetch locations", e))?;
        out.extend(page.items);
        match page.next_page_info {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(out)
}

async fn fetch_products(api: &dyn PlatformApi) -> Result<Vec<ShopifyProduct>> {
    let mut out = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = api
            .get_products(PAGE_LIMIT, cursor.as_deref())
            .await
            .map_err(|e| SyncError::upstream("failed to fetch products", e))?;
        out.extend(page.items);
        match page.next_page_info {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(out)
}

async fn fetch_inventory_items(
    api: &dyn PlatformApi,
    ids: &[i64],
) -> Result<Vec<ShopifyInventoryItem>> {
    let mut out = Vec::new();
    for batch in ids.chunks(INVENTORY_ITEM_BATCH_SIZE) {
        let page = api
            .get_inventory_items(batch, INVENTORY_ITEM_BATCH_SIZE as u32, None)
            .await
            .map_err(|e| SyncError::upstream("failed to fetch inventory items", e))?;
        out.extend(page.items);
    }
    Ok(out)
}

async fn fetch_inventory_levels(
    api: &dyn PlatformApi,
    ids: &[i64],
) -> Result<Vec<ShopifyInventoryLevel>> {
    let mut out = Vec::new();
    for batch in ids.chunks(INVENTORY_ITEM_BATCH_SIZE) {
        let mut cursor: Option<String> = None;
        loop {
            let page = api
                .get_inventory_levels(batch, PAGE_LIMIT, cursor.as_deref())
                .await
                .map_err(|e| SyncError::upstream("failed to fetch inventory levels", e))?;
            out.extend(page.items);
            match page.next_page_info {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
    }
    Ok(out)
}

async fn fetch_orders(api: &dyn PlatformApi) -> Result<Vec<ShopifyOrder>> {
    let created_at_min = Utc::now() - Duration::days(ORDER_WINDOW_DAYS);
    let mut out = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = api
            .get_orders(created_at_min, PAGE_LIMIT, cursor.as_deref())
            .await
            .map_err(|e| SyncError::upstream("failed to fetch orders", e))?;
        out.extend(page.items);
        match page.next_page_info {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(out)
}

/// Phase A: fetch everything for a full sync.
pub async fn fetch_all(api: &dyn PlatformApi) -> Result<FetchedData> {
    // Shop metadata is best effort: a denied scope must not fail the sync.
    let shop = match api.get_shop().await {
        Ok(info) => Some(info),
        Err(err) => {
            tracing::warn!(error = %err, "failed to fetch shop info, keeping stored metadata");
            None
        }
    };

    let locations = fetch_locations(api).await?;
    tracing::info!(count = locations.len(), "locations fetched");

    let products = fetch_products(api).await?;
    tracing::info!(count = products.len(), "products fetched");

    let item_ids = normalize::collect_inventory_item_ids(&products);
    let inventory_items = fetch_inventory_items(api, &item_ids).await?;
    let inventory_levels = fetch_inventory_levels(api, &item_ids).await?;
    tracing::info!(
        items = inventory_items.len(),
        levels = inventory_levels.len(),
        "inventory fetched"
    );

    let orders = fetch_orders(api).await?;
    tracing::info!(count = orders.len(), "orders fetched");

    Ok(FetchedData {
        shop,
        locations,
        products,
        inventory_items,
        inventory_levels,
        orders,
    })
}

async fn apply_locations<C: ConnectionTrait>(
    txn: &C,
    integration_id: &IntegrationId,
    raw: &[ShopifyLocation],
    now: DateTime<Utc>,
) -> Result<u64> {
    let models = normalize::normalize_locations(integration_id, raw, now);
    Ok(store::upsert_locations(txn, models).await?)
}

/// Upsert products, variants, inventory items, and levels, binding child
/// rows to the parent rows that actually survived each upsert.
async fn apply_catalog<C: ConnectionTrait>(
    txn: &C,
    integration_id: &IntegrationId,
    products_raw: &[ShopifyProduct],
    items_raw: &[ShopifyInventoryItem],
    levels_raw: &[ShopifyInventoryLevel],
    now: DateTime<Utc>,
) -> Result<(u64, u64, u64, u64)> {
    let (product_models, variant_drafts) =
        normalize::normalize_products(integration_id, products_raw, now);
    let products_written = store::upsert_products(txn, product_models).await?;
    let product_ids = store::product_id_map(txn, integration_id).await?;

    let mut variant_models = Vec::with_capacity(variant_drafts.len());
    for draft in variant_drafts {
        match product_ids.get(&draft.product_external_id) {
            Some(product_id) => {
                let mut model = draft.model;
                model.product_id = sea_orm::Set(product_id.clone());
                variant_models.push(model);
            }
            None => {
                tracing::warn!(
                    product_external_id = %draft.product_external_id,
                    "skipping variant with unresolved parent product"
                );
            }
        }
    }
    let variants_written = store::upsert_variants(txn, variant_models).await?;

    let item_models = normalize::normalize_inventory_items(integration_id, items_raw, now);
    let items_written = store::upsert_inventory_items(txn, item_models).await?;

    let item_ids = store::inventory_item_id_map(txn, integration_id).await?;
    let location_ids = store::location_id_map(txn, integration_id).await?;
    let mut level_models = Vec::new();
    for draft in normalize::normalize_inventory_levels(levels_raw) {
        match (
            item_ids.get(&draft.item_external_id),
            location_ids.get(&draft.location_external_id),
        ) {
            (Some(item_id), Some(location_id)) => {
                level_models.push(normalize::level_model(
                    &draft,
                    item_id.clone(),
                    location_id.clone(),
                    now,
                ));
            }
            _ => {
                tracing::warn!(
                    item_external_id = %draft.item_external_id,
                    location_external_id = %draft.location_external_id,
                    "skipping inventory level with unresolved references"
                );
            }
        }
    }
    let levels_written = store::upsert_inventory_levels(txn, level_models).await?;

    Ok((products_written, variants_written, items_written, levels_written))
}

async fn apply_orders<C: ConnectionTrait>(
    txn: &C,
    integration_id: &IntegrationId,
    raw: &[ShopifyOrder],
    now: DateTime<Utc>,
) -> Result<(u64, u64)> {
    let (order_models, line_item_drafts) =
        normalize::normalize_orders(integration_id, raw, now);
    let orders_written = store::upsert_orders(txn, order_models).await?;

    let order_ids = store::order_id_map(txn, integration_id).await?;
    let product_ids = store::product_id_map(txn, integration_id).await?;
    let mut line_item_models = Vec::with_capacity(line_item_drafts.len());
    for draft in line_item_drafts {
        match order_ids.get(&draft.order_external_id) {
            Some(order_id) => {
                let mut model = draft.model;
                model.order_id = sea_orm::Set(order_id.clone());
                model.product_id = sea_orm::Set(
                    draft
                        .product_external_id
                        .as_ref()
                        .and_then(|ext| product_ids.get(ext))
                        .cloned(),
                );
                line_item_models.push(model);
            }
            None => {
                tracing::warn!(
                    order_external_id = %draft.order_external_id,
                    "skipping line item with unresolved order"
                );
            }
        }
    }
    let line_items_written = store::upsert_line_items(txn, line_item_models).await?;

    Ok((orders_written, line_items_written))
}

/// Phases B+C: normalize and upsert everything inside one transaction.
async fn apply_full<C: ConnectionTrait>(
    txn: &C,
    integration: &PlatformIntegrationModel,
    fetched: &FetchedData,
) -> Result<SyncStats> {
    let now = Utc::now();
    let mut stats = SyncStats::default();

    if let Some(shop) = &fetched.shop {
        let display_name = (!shop.name.is_empty()).then(|| shop.name.clone());
        let timezone = (!shop.iana_timezone.is_empty()).then(|| shop.iana_timezone.clone());
        let currency = (!shop.currency.is_empty()).then(|| shop.currency.clone());
        store::update_shop_metadata(txn, &integration.shop_id, display_name, timezone, currency)
            .await?;
    }

    stats.locations = apply_locations(txn, &integration.id, &fetched.locations, now).await?;

    let (products, variants, items, levels) = apply_catalog(
        txn,
        &integration.id,
        &fetched.products,
        &fetched.inventory_items,
        &fetched.inventory_levels,
        now,
    )
    .await?;
    stats.products = products;
    stats.product_variants = variants;
    stats.inventory_items = items;
    stats.inventory_levels = levels;

    let (orders, line_items) =
        apply_orders(txn, &integration.id, &fetched.orders, now).await?;
    stats.orders = orders;
    stats.order_line_items = line_items;

    Ok(stats)
}

async fn load_integration(
    db: &DatabaseConnection,
    integration_id: &IntegrationId,
) -> Result<PlatformIntegrationModel> {
    store::find_integration(db, integration_id)
        .await?
        .ok_or_else(|| SyncError::Validation(format!("integration {integration_id} not found")))
}

/// Run a complete sync for one integration.
///
/// On success the `full_sync` state row is `completed` in the same
/// transaction as the writes. On failure the transaction has rolled back and
/// the error propagates; recording `failed` is the caller's job (it must
/// happen outside the aborted transaction).
pub async fn run_full_sync(
    db: &DatabaseConnection,
    api: &dyn PlatformApi,
    integration_id: &IntegrationId,
) -> Result<SyncStats> {
    let integration = load_integration(db, integration_id).await?;

    tracing::info!(integration_id = %integration.id, "full sync: fetch phase");
    let fetched = fetch_all(api).await?;

    tracing::info!(integration_id = %integration.id, "full sync: write phase");
    let txn = db.begin().await?;
    let stats = match apply_full(&txn, &integration, &fetched).await {
        Ok(stats) => stats,
        Err(err) => {
            let _ = txn.rollback().await;
            return Err(err);
        }
    };
    if let Err(err) = store::mark_completed(&txn, &integration.id, SyncEntity::FullSync).await {
        let _ = txn.rollback().await;
        return Err(err.into());
    }
    txn.commit().await?;

    tracing::info!(
        integration_id = %integration.id,
        locations = stats.locations,
        products = stats.products,
        variants = stats.product_variants,
        inventory_items = stats.inventory_items,
        inventory_levels = stats.inventory_levels,
        orders = stats.orders,
        line_items = stats.order_line_items,
        "full sync completed"
    );
    Ok(stats)
}

/// Sub-pipeline: locations only.
pub async fn run_locations_sync(
    db: &DatabaseConnection,
    api: &dyn PlatformApi,
    integration_id: &IntegrationId,
) -> Result<SyncStats> {
    let integration = load_integration(db, integration_id).await?;
    let locations = fetch_locations(api).await?;

    let txn = db.begin().await?;
    let mut stats = SyncStats::default();
    match apply_locations(&txn, &integration.id, &locations, Utc::now()).await {
        Ok(written) => stats.locations = written,
        Err(err) => {
            let _ = txn.rollback().await;
            return Err(err);
        }
    }
    if let Err(err) = store::mark_completed(&txn, &integration.id, SyncEntity::Locations).await {
        let _ = txn.rollback().await;
        return Err(err.into());
    }
    txn.commit().await?;
    Ok(stats)
}

/// Sub-pipeline: products, variants, and the inventory behind them.
pub async fn run_products_sync(
    db: &DatabaseConnection,
    api: &dyn PlatformApi,
    integration_id: &IntegrationId,
) -> Result<SyncStats> {
    let integration = load_integration(db, integration_id).await?;
    let products = fetch_products(api).await?;
    let item_ids = normalize::collect_inventory_item_ids(&products);
    let items = fetch_inventory_items(api, &item_ids).await?;
    let levels = fetch_inventory_levels(api, &item_ids).await?;

    let txn = db.begin().await?;
    let mut stats = SyncStats::default();
    match apply_catalog(&txn, &integration.id, &products, &items, &levels, Utc::now()).await {
        Ok((products, variants, items, levels)) => {
            stats.products = products;
            stats.product_variants = variants;
            stats.inventory_items = items;
            stats.inventory_levels = levels;
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return Err(err);
        }
    }
    for entity in [SyncEntity::Products, SyncEntity::Inventory] {
        if let Err(err) = store::mark_completed(&txn, &integration.id, entity).await {
            let _ = txn.rollback().await;
            return Err(err.into());
        }
    }
    txn.commit().await?;
    Ok(stats)
}

/// Sub-pipeline: orders and their line items.
pub async fn run_orders_sync(
    db: &DatabaseConnection,
    api: &dyn PlatformApi,
    integration_id: &IntegrationId,
) -> Result<SyncStats> {
    let integration = load_integration(db, integration_id).await?;
    let orders = fetch_orders(api).await?;

    let txn = db.begin().await?;
    let mut stats = SyncStats::default();
    match apply_orders(&txn, &integration.id, &orders, Utc::now()).await {
        Ok((orders, line_items)) => {
            stats.orders = orders;
            stats.order_line_items = line_items;
        }
        Err(err) => {
            let _ = txn.rollback().await;
            return Err(err);
        }
    }
    if let Err(err) = store::mark_completed(&txn, &integration.id, SyncEntity::Orders).await {
        let _ = txn.rollback().await;
        return Err(err.into());
    }
    txn.commit().await?;
    Ok(stats)
}
