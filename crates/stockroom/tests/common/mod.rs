//! Shared fixtures for the integration suites: an in-memory database with
//! the full schema, seeded account rows, a scripted platform double, and
//! recording/failing queue doubles.

// Each test binary uses a different subset of these fixtures.
#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use stockroom::crypto::SecretCipher;
use stockroom::entity::prelude::*;
use stockroom::id::{ShopId, UserId};
use stockroom::queue::{QueueError, TaskHandle, TaskKind, TaskQueue};
use stockroom::shopify::{
    Page, PlatformApi, Result as ShopifyResult, ShopInfo, ShopifyError, ShopifyInventoryItem,
    ShopifyInventoryLevel, ShopifyLineItem, ShopifyLocation, ShopifyOrder, ShopifyProduct,
    ShopifyVariant,
};

pub const SECRET_KEY: &str = "0123456789abcdef0123456789abcdef";
pub const SHOP_DOMAIN: &str = "demo.myshopify.com";
pub const ACCESS_TOKEN: &str = "shpat_example";

pub fn cipher() -> SecretCipher {
    SecretCipher::new(SECRET_KEY).expect("32-byte key")
}

/// Fresh in-memory database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    stockroom::connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory sqlite should migrate")
}

/// Seed a user, the demo shop, and an encrypted credential binding them.
pub async fn seed_account(db: &DatabaseConnection) -> (UserId, ShopId) {
    let now = Utc::now();
    let user_id = UserId::generate();
    let shop_id = ShopId::generate();

    User::insert(UserActiveModel {
        id: Set(user_id.clone()),
        email: Set("merchant@example.com".to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .exec_without_returning(db)
    .await
    .expect("seed user");

    Shop::insert(ShopActiveModel {
        id: Set(shop_id.clone()),
        domain: Set(SHOP_DOMAIN.to_owned()),
        display_name: Set(None),
        timezone: Set(None),
        currency: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .exec_without_returning(db)
    .await
    .expect("seed shop");

    let envelope = cipher().encrypt(ACCESS_TOKEN).expect("encrypt token");
    stockroom::store::upsert_credential(db, &user_id, &shop_id, envelope, None)
        .await
        .expect("seed credential");

    (user_id, shop_id)
}

/// Scripted platform double. Serves fixed data in single pages; optionally
/// fails a chosen endpoint with an API error.
#[derive(Default)]
pub struct FakePlatform {
    pub shop: Option<ShopInfo>,
    pub locations: Vec<ShopifyLocation>,
    pub products: Vec<ShopifyProduct>,
    pub inventory_items: Vec<ShopifyInventoryItem>,
    pub inventory_levels: Vec<ShopifyInventoryLevel>,
    pub orders: Vec<ShopifyOrder>,
    /// When set, `get_products` answers with this (status, body) error.
    pub fail_products: Option<(u16, String)>,
}

impl FakePlatform {
    /// The Scenario A catalog: 2 locations, 3 products with 2 variants each,
    /// 6 inventory items, levels at the first location, 0 orders.
    pub fn demo_catalog() -> Self {
        let locations = vec![
            ShopifyLocation {
                id: 101,
                name: "Main Warehouse".to_owned(),
                address1: "1 Main St".to_owned(),
                city: "Springfield".to_owned(),
                country: "US".to_owned(),
                province: "IL".to_owned(),
                ..Default::default()
            },
            ShopifyLocation {
                id: 102,
                name: "Storefront".to_owned(),
                address1: "9 Market Sq".to_owned(),
                city: "Springfield".to_owned(),
                country: "US".to_owned(),
                ..Default::default()
            },
        ];

        let mut products = Vec::new();
        let mut inventory_items = Vec::new();
        let mut inventory_levels = Vec::new();
        for p in 0..3i64 {
            let product_id = 1000 + p;
            let mut variants = Vec::new();
            for v in 0..2i64 {
                let variant_id = 2000 + p * 10 + v;
                let item_id = 3000 + p * 10 + v;
                variants.push(ShopifyVariant {
                    id: variant_id,
                    product_id,
                    sku: format!("SKU-{product_id}-{v}"),
                    price: "12.50".to_owned(),
                    inventory_item_id: item_id,
                    inventory_quantity: 5,
                });
                inventory_items.push(ShopifyInventoryItem {
                    id: item_id,
                    sku: format!("SKU-{product_id}-{v}"),
                    tracked: true,
                    cost: "7.25".to_owned(),
                });
                inventory_levels.push(ShopifyInventoryLevel {
                    inventory_item_id: item_id,
                    location_id: 101,
                    available: Some(5),
                });
            }
            products.push(ShopifyProduct {
                id: product_id,
                title: format!("Product {p}"),
                handle: format!("product-{p}"),
                product_type: "Widget".to_owned(),
                status: "active".to_owned(),
                variants,
            });
        }

        Self {
            shop: Some(ShopInfo {
                id: 1,
                name: "Demo Shop".to_owned(),
                currency: "USD".to_owned(),
                iana_timezone: "America/Chicago".to_owned(),
            }),
            locations,
            products,
            inventory_items,
            inventory_levels,
            orders: Vec::new(),
            fail_products: None,
        }
    }

    /// Add one paid order with a line item referencing the first product.
    pub fn with_demo_order(mut self) -> Self {
        self.orders.push(ShopifyOrder {
            id: 5001,
            created_at: Some(Utc::now()),
            financial_status: "paid".to_owned(),
            fulfillment_status: None,
            total_price: "25.00".to_owned(),
            currency: "USD".to_owned(),
            cancelled_at: None,
            line_items: vec![ShopifyLineItem {
                id: 7001,
                product_id: Some(1000),
                variant_id: Some(2000),
                quantity: 2,
                price: "12.50".to_owned(),
            }],
        });
        self
    }
}

fn single_page<T: Clone>(items: &[T]) -> Page<T> {
    Page {
        items: items.to_vec(),
        next_page_info: None,
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn get_shop(&self) -> ShopifyResult<ShopInfo> {
        match &self.shop {
            Some(info) => Ok(info.clone()),
            None => Err(ShopifyError::Api {
                status: 403,
                message: "shop scope denied".to_owned(),
            }),
        }
    }

    async fn get_locations(
        &self,
        _limit: u32,
        _page_info: Option<&str>,
    ) -> ShopifyResult<Page<ShopifyLocation>> {
        Ok(single_page(&self.locations))
    }

    async fn get_products(
        &self,
        _limit: u32,
        _page_info: Option<&str>,
    ) -> ShopifyResult<Page<ShopifyProduct>> {
        if let Some((status, message)) = &self.fail_products {
            return Err(ShopifyError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        Ok(single_page(&self.products))
    }

    async fn get_inventory_items(
        &self,
        ids: &[i64],
        _limit: u32,
        _page_info: Option<&str>,
    ) -> ShopifyResult<Page<ShopifyInventoryItem>> {
        let items: Vec<_> = self
            .inventory_items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect();
        Ok(Page {
            items,
            next_page_info: None,
        })
    }

    async fn get_inventory_levels(
        &self,
        inventory_item_ids: &[i64],
        _limit: u32,
        _page_info: Option<&str>,
    ) -> ShopifyResult<Page<ShopifyInventoryLevel>> {
        let items: Vec<_> = self
            .inventory_levels
            .iter()
            .filter(|level| inventory_item_ids.contains(&level.inventory_item_id))
            .cloned()
            .collect();
        Ok(Page {
            items,
            next_page_info: None,
        })
    }

    async fn get_orders(
        &self,
        _created_at_min: DateTime<Utc>,
        _limit: u32,
        _page_info: Option<&str>,
    ) -> ShopifyResult<Page<ShopifyOrder>> {
        Ok(single_page(&self.orders))
    }
}

/// Queue double that records enqueues.
#[derive(Default)]
pub struct RecordingQueue {
    pub enqueued: Mutex<Vec<(TaskKind, serde_json::Value)>>,
}

impl RecordingQueue {
    pub fn count(&self) -> usize {
        self.enqueued.lock().unwrap().len()
    }
}

#[async_trait]
impl TaskQueue for RecordingQueue {
    async fn enqueue(
        &self,
        kind: TaskKind,
        payload: serde_json::Value,
    ) -> Result<TaskHandle, QueueError> {
        self.enqueued.lock().unwrap().push((kind, payload));
        Ok(TaskHandle {
            id: format!("task-{}", self.count()),
        })
    }
}

/// Queue double whose enqueue always fails.
pub struct FailingQueue;

#[async_trait]
impl TaskQueue for FailingQueue {
    async fn enqueue(
        &self,
        _kind: TaskKind,
        _payload: serde_json::Value,
    ) -> Result<TaskHandle, QueueError> {
        let decode_err = serde_json::from_str::<i32>("broker down").unwrap_err();
        Err(QueueError::Payload(decode_err))
    }
}
