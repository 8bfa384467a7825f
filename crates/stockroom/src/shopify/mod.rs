//! Shopify Admin REST client.
//!
//! A single-shop client bound to `(shop_domain, access_token)`. Every request
//! waits on a token-bucket rate limiter, carries the access-token header, and
//! decodes cursor pagination from the response `Link` header. Callers drive
//! pagination by re-calling with the returned `page_info` cursor until it is
//! empty.

mod client;
mod domain;
mod error;
mod pagination;
mod rate_limit;
mod types;

pub use client::{API_VERSION, ShopifyClient};
pub use domain::normalize_domain;
pub use error::{Result, ShopifyError};
pub use pagination::{Page, PageInfo, parse_link_header};
pub use rate_limit::{ApiRateLimiter, rate_limits};
pub use types::{
    ShopInfo, ShopifyInventoryItem, ShopifyInventoryLevel, ShopifyLineItem, ShopifyLocation,
    ShopifyOrder, ShopifyProduct, ShopifyVariant,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Platform API seam consumed by the ingestion pipeline.
///
/// [`ShopifyClient`] is the production implementation; tests substitute
/// in-memory doubles. Each paginated call returns one page plus the cursor
/// for the next.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Fetch shop metadata.
    async fn get_shop(&self) -> Result<ShopInfo>;

    /// Fetch one page of locations.
    async fn get_locations(&self, limit: u32, page_info: Option<&str>)
    -> Result<Page<ShopifyLocation>>;

    /// Fetch one page of products; variants come embedded.
    async fn get_products(&self, limit: u32, page_info: Option<&str>)
    -> Result<Page<ShopifyProduct>>;

    /// Fetch one page of inventory items by platform id.
    async fn get_inventory_items(
        &self,
        ids: &[i64],
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyInventoryItem>>;

    /// Fetch one page of inventory levels for the given item ids.
    async fn get_inventory_levels(
        &self,
        inventory_item_ids: &[i64],
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyInventoryLevel>>;

    /// Fetch one page of orders created at or after `created_at_min`;
    /// line items come embedded.
    async fn get_orders(
        &self,
        created_at_min: DateTime<Utc>,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyOrder>>;
}
