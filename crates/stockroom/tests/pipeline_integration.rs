//! Integration tests for the ingestion pipeline against in-memory SQLite.
//!
//! Covers the happy path row counts, idempotent re-runs, foreign-key
//! resolution, enum collapsing, and the rollback behavior on upstream
//! failure.

mod common;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use stockroom::entity::prelude::*;
use stockroom::store;
use stockroom::sync::{SyncError, run_full_sync};

use common::{FakePlatform, SHOP_DOMAIN, seed_account, setup_db};

/// First-time sync, happy path: 2 locations, 3 products with 2 variants
/// each, 6 inventory items, 0 orders.
#[tokio::test]
async fn first_full_sync_materializes_the_catalog() {
    let db = setup_db().await;
    let (_, shop_id) = seed_account(&db).await;
    let integration =
        store::get_or_create_integration(&db, &shop_id, PlatformKind::Shopify, SHOP_DOMAIN)
            .await
            .unwrap();

    let platform = FakePlatform::demo_catalog();
    let started_at = Utc::now();
    let stats = run_full_sync(&db, &platform, &integration.id).await.unwrap();

    assert_eq!(stats.locations, 2);
    assert_eq!(stats.products, 3);
    assert_eq!(stats.product_variants, 6);
    assert_eq!(stats.inventory_items, 6);
    assert_eq!(stats.inventory_levels, 6);
    assert_eq!(stats.orders, 0);

    assert_eq!(Location::find().count(&db).await.unwrap(), 2);
    assert_eq!(Product::find().count(&db).await.unwrap(), 3);
    assert_eq!(ProductVariant::find().count(&db).await.unwrap(), 6);
    assert_eq!(InventoryItem::find().count(&db).await.unwrap(), 6);
    assert_eq!(InventoryLevel::find().count(&db).await.unwrap(), 6);
    assert_eq!(Order::find().count(&db).await.unwrap(), 0);

    let state = store::find_sync_state(&db, &integration.id, SyncEntity::FullSync)
        .await
        .unwrap()
        .expect("full_sync state row must exist");
    assert_eq!(state.status, SyncStatus::Completed);
    let last_synced = state.last_synced_at.expect("completed sync has timestamp");
    assert!(last_synced >= started_at);
    assert!((Utc::now() - last_synced).num_seconds() < 5);
    assert_eq!(state.error_message, None);

    // Shop metadata refreshed from the platform.
    let shop = Shop::find_by_id(shop_id).one(&db).await.unwrap().unwrap();
    assert_eq!(shop.display_name.as_deref(), Some("Demo Shop"));
    assert_eq!(shop.currency.as_deref(), Some("USD"));
    assert_eq!(shop.timezone.as_deref(), Some("America/Chicago"));
}

/// Running the pipeline twice against unchanged data changes no row
/// identities and no row counts.
#[tokio::test]
async fn full_sync_is_idempotent() {
    let db = setup_db().await;
    let (_, shop_id) = seed_account(&db).await;
    let integration =
        store::get_or_create_integration(&db, &shop_id, PlatformKind::Shopify, SHOP_DOMAIN)
            .await
            .unwrap();

    let platform = FakePlatform::demo_catalog().with_demo_order();
    run_full_sync(&db, &platform, &integration.id).await.unwrap();

    let products_before = Product::find().all(&db).await.unwrap();
    let variants_before = ProductVariant::find().all(&db).await.unwrap();
    let orders_before = Order::find().all(&db).await.unwrap();

    run_full_sync(&db, &platform, &integration.id).await.unwrap();

    let products_after = Product::find().all(&db).await.unwrap();
    let variants_after = ProductVariant::find().all(&db).await.unwrap();
    let orders_after = Order::find().all(&db).await.unwrap();

    assert_eq!(products_before.len(), products_after.len());
    assert_eq!(variants_before.len(), variants_after.len());
    assert_eq!(orders_before.len(), orders_after.len());

    // The upsert key, not the generated id, establishes identity: ids and
    // content survive a re-run bit-identically apart from updated_at.
    for (before, after) in products_before.iter().zip(products_after.iter()) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.external_id, after.external_id);
        assert_eq!(before.handle, after.handle);
        assert_eq!(before.title, after.title);
        assert_eq!(before.status, after.status);
        assert_eq!(before.created_at, after.created_at);
    }
    for (before, after) in variants_before.iter().zip(variants_after.iter()) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.product_id, after.product_id);
        assert_eq!(before.price, after.price);
    }
    for (before, after) in orders_before.iter().zip(orders_after.iter()) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.external_id, after.external_id);
    }
}

/// Every foreign key written by a sync resolves.
#[tokio::test]
async fn foreign_keys_resolve_after_sync() {
    let db = setup_db().await;
    let (_, shop_id) = seed_account(&db).await;
    let integration =
        store::get_or_create_integration(&db, &shop_id, PlatformKind::Shopify, SHOP_DOMAIN)
            .await
            .unwrap();

    let platform = FakePlatform::demo_catalog().with_demo_order();
    run_full_sync(&db, &platform, &integration.id).await.unwrap();

    for variant in ProductVariant::find().all(&db).await.unwrap() {
        assert!(
            Product::find_by_id(variant.product_id.clone())
                .one(&db)
                .await
                .unwrap()
                .is_some(),
            "variant {} has dangling product",
            variant.external_id
        );
    }

    for level in InventoryLevel::find().all(&db).await.unwrap() {
        assert!(
            InventoryItem::find_by_id(level.inventory_item_id.clone())
                .one(&db)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            Location::find_by_id(level.location_id.clone())
                .one(&db)
                .await
                .unwrap()
                .is_some()
        );
    }

    for line_item in OrderLineItem::find().all(&db).await.unwrap() {
        assert!(
            Order::find_by_id(line_item.order_id.clone())
                .one(&db)
                .await
                .unwrap()
                .is_some()
        );
        if let Some(product_id) = line_item.product_id {
            assert!(Product::find_by_id(product_id).one(&db).await.unwrap().is_some());
        }
    }
}

/// Enum-valued fields land in the closed sets; unknown inputs collapse to
/// the documented defaults.
#[tokio::test]
async fn enum_values_collapse_into_closed_sets() {
    let db = setup_db().await;
    let (_, shop_id) = seed_account(&db).await;
    let integration =
        store::get_or_create_integration(&db, &shop_id, PlatformKind::Shopify, SHOP_DOMAIN)
            .await
            .unwrap();

    let mut platform = FakePlatform::demo_catalog().with_demo_order();
    platform.products[0].status = "discontinued".to_owned();
    platform.orders[0].financial_status = "settled".to_owned();
    platform.orders[0].fulfillment_status = Some("shipped".to_owned());

    run_full_sync(&db, &platform, &integration.id).await.unwrap();

    let odd_product = Product::find()
        .filter(ProductColumn::ExternalId.eq("1000"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(odd_product.status, ProductStatus::Draft);

    let order = Order::find().one(&db).await.unwrap().unwrap();
    assert_eq!(order.financial_status, FinancialStatus::Pending);
    assert_eq!(order.fulfillment_status, None);
    assert_eq!(order.total_price, Some(Decimal::new(2500, 2)));
}

/// Upstream failure mid-pipeline: nothing from the aborted run is visible
/// and the error carries the upstream status.
#[tokio::test]
async fn upstream_failure_rolls_back_the_write_phase() {
    let db = setup_db().await;
    let (_, shop_id) = seed_account(&db).await;
    let integration =
        store::get_or_create_integration(&db, &shop_id, PlatformKind::Shopify, SHOP_DOMAIN)
            .await
            .unwrap();

    let mut platform = FakePlatform::demo_catalog();
    platform.fail_products = Some((500, "Internal Server Error".to_owned()));

    let err = run_full_sync(&db, &platform, &integration.id)
        .await
        .expect_err("pipeline must fail");
    let rendered = err.to_string();
    assert!(rendered.contains("failed to fetch products"));
    assert!(rendered.contains("500"), "missing upstream status: {rendered}");
    assert!(matches!(err, SyncError::Upstream { .. }));

    // The fetch aborted before any write: locations were fetched but must
    // not be visible.
    assert_eq!(Location::find().count(&db).await.unwrap(), 0);
    assert_eq!(Product::find().count(&db).await.unwrap(), 0);

    // Recording `failed` is the worker envelope's job, in its own
    // transaction, exactly as the handler does it.
    store::mark_failed(&db, &integration.id, SyncEntity::FullSync, &rendered)
        .await
        .unwrap();
    let state = store::find_sync_state(&db, &integration.id, SyncEntity::FullSync)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.status, SyncStatus::Failed);
    assert!(state.error_message.unwrap().contains("500"));
}

/// Pagination is driven until the `next` cursor comes back empty; the
/// accumulated count equals the provider's total.
#[tokio::test]
async fn fetch_exhausts_pagination() {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use stockroom::shopify::{
        Page, PlatformApi, Result as ShopifyResult, ShopInfo, ShopifyInventoryItem,
        ShopifyInventoryLevel, ShopifyLocation, ShopifyOrder, ShopifyProduct,
    };

    /// Serves 520 locations in three pages behind opaque cursors.
    struct PagedPlatform;

    #[async_trait]
    impl PlatformApi for PagedPlatform {
        async fn get_shop(&self) -> ShopifyResult<ShopInfo> {
            Ok(ShopInfo::default())
        }

        async fn get_locations(
            &self,
            limit: u32,
            page_info: Option<&str>,
        ) -> ShopifyResult<Page<ShopifyLocation>> {
            assert_eq!(limit, 250);
            let (start, next) = match page_info {
                None => (0, Some("cursor-2".to_owned())),
                Some("cursor-2") => (250, Some("cursor-3".to_owned())),
                Some("cursor-3") => (500, None),
                Some(other) => panic!("unexpected cursor {other}"),
            };
            let end = std::cmp::min(start + 250, 520);
            let items = (start..end)
                .map(|i| ShopifyLocation {
                    id: i as i64 + 1,
                    name: format!("Location {i}"),
                    ..Default::default()
                })
                .collect();
            Ok(Page {
                items,
                next_page_info: next,
            })
        }

        async fn get_products(
            &self,
            _limit: u32,
            _page_info: Option<&str>,
        ) -> ShopifyResult<Page<ShopifyProduct>> {
            Ok(Page::empty())
        }

        async fn get_inventory_items(
            &self,
            _ids: &[i64],
            _limit: u32,
            _page_info: Option<&str>,
        ) -> ShopifyResult<Page<ShopifyInventoryItem>> {
            Ok(Page::empty())
        }

        async fn get_inventory_levels(
            &self,
            _inventory_item_ids: &[i64],
            _limit: u32,
            _page_info: Option<&str>,
        ) -> ShopifyResult<Page<ShopifyInventoryLevel>> {
            Ok(Page::empty())
        }

        async fn get_orders(
            &self,
            _created_at_min: DateTime<Utc>,
            _limit: u32,
            _page_info: Option<&str>,
        ) -> ShopifyResult<Page<ShopifyOrder>> {
            Ok(Page::empty())
        }
    }

    let fetched = stockroom::sync::fetch_all(&PagedPlatform).await.unwrap();
    assert_eq!(fetched.locations.len(), 520);
}

/// A completed re-run advances `last_synced_at` monotonically.
#[tokio::test]
async fn last_synced_at_is_monotonic() {
    let db = setup_db().await;
    let (_, shop_id) = seed_account(&db).await;
    let integration =
        store::get_or_create_integration(&db, &shop_id, PlatformKind::Shopify, SHOP_DOMAIN)
            .await
            .unwrap();

    let platform = FakePlatform::demo_catalog();
    run_full_sync(&db, &platform, &integration.id).await.unwrap();
    let first = store::find_sync_state(&db, &integration.id, SyncEntity::FullSync)
        .await
        .unwrap()
        .unwrap()
        .last_synced_at
        .unwrap();

    run_full_sync(&db, &platform, &integration.id).await.unwrap();
    let second = store::find_sync_state(&db, &integration.id, SyncEntity::FullSync)
        .await
        .unwrap()
        .unwrap()
        .last_synced_at
        .unwrap();

    assert!(second >= first);
}
