//! Shopify Admin API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, header};
use serde::de::DeserializeOwned;

use super::PlatformApi;
use super::error::{Result, ShopifyError};
use super::pagination::{Page, PageInfo, parse_link_header};
use super::rate_limit::{ApiRateLimiter, rate_limits};
use super::types::{
    InventoryItemsResponse, InventoryLevelsResponse, LocationsResponse, OrdersResponse,
    ProductsResponse, ShopInfo, ShopResponse, ShopifyInventoryItem, ShopifyInventoryLevel,
    ShopifyLocation, ShopifyOrder, ShopifyProduct,
};

/// Admin API version all requests are pinned to.
pub const API_VERSION: &str = "2023-10";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Access-token header required by the Admin API.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Single-shop client for the Shopify Admin REST API.
///
/// Every request blocks on the shop's token bucket before hitting the wire,
/// so a client instance can be shared freely without overrunning the
/// platform's rate limit. Cloning shares the HTTP pool and the bucket.
#[derive(Clone)]
pub struct ShopifyClient {
    client: Client,
    shop_domain: String,
    access_token: String,
    limiter: ApiRateLimiter,
}

impl ShopifyClient {
    /// Create a client bound to `(shop_domain, access_token)`.
    ///
    /// # Arguments
    /// * `shop_domain` - normalized shop domain (e.g. `demo.myshopify.com`)
    /// * `access_token` - decrypted access token for this shop
    pub fn new(shop_domain: &str, access_token: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            shop_domain: shop_domain.to_owned(),
            access_token: access_token.to_owned(),
            limiter: ApiRateLimiter::new(
                rate_limits::SHOPIFY_DEFAULT_RPS,
                rate_limits::SHOPIFY_DEFAULT_BURST,
            ),
        })
    }

    /// The shop domain this client is bound to.
    pub fn shop_domain(&self) -> &str {
        &self.shop_domain
    }

    /// Make a rate-limited GET request and decode the JSON body, returning
    /// the pagination cursors from the `Link` header alongside.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(T, PageInfo)> {
        self.limiter.wait().await;

        let url = format!(
            "https://{}/admin/api/{}{}",
            self.shop_domain, API_VERSION, path
        );

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await?;

        let status = response.status();
        let page_info = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        if status.as_u16() >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let data = serde_json::from_str(&body)?;
        Ok((data, page_info))
    }
}

fn pagination_params(limit: u32, page_info: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(2);
    if limit > 0 {
        params.push(("limit", limit.to_string()));
    }
    if let Some(cursor) = page_info {
        params.push(("page_info", cursor.to_owned()));
    }
    params
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl PlatformApi for ShopifyClient {
    async fn get_shop(&self) -> Result<ShopInfo> {
        let (response, _) = self.get::<ShopResponse>("/shop.json", &[]).await?;
        Ok(response.shop)
    }

    async fn get_locations(
        &self,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyLocation>> {
        let params = pagination_params(limit, page_info);
        let (response, info) = self
            .get::<LocationsResponse>("/locations.json", &params)
            .await?;
        Ok(Page {
            items: response.locations,
            next_page_info: info.next,
        })
    }

    async fn get_products(
        &self,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyProduct>> {
        let params = pagination_params(limit, page_info);
        let (response, info) = self
            .get::<ProductsResponse>("/products.json", &params)
            .await?;
        Ok(Page {
            items: response.products,
            next_page_info: info.next,
        })
    }

    async fn get_inventory_items(
        &self,
        ids: &[i64],
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyInventoryItem>> {
        if ids.is_empty() {
            return Ok(Page::empty());
        }

        let mut params = pagination_params(limit, page_info);
        params.push(("ids", join_ids(ids)));
        let (response, info) = self
            .get::<InventoryItemsResponse>("/inventory_items.json", &params)
            .await?;
        Ok(Page {
            items: response.inventory_items,
            next_page_info: info.next,
        })
    }

    async fn get_inventory_levels(
        &self,
        inventory_item_ids: &[i64],
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyInventoryLevel>> {
        if inventory_item_ids.is_empty() {
            return Ok(Page::empty());
        }

        let mut params = pagination_params(limit, page_info);
        params.push(("inventory_item_ids", join_ids(inventory_item_ids)));
        let (response, info) = self
            .get::<InventoryLevelsResponse>("/inventory_levels.json", &params)
            .await?;
        Ok(Page {
            items: response.inventory_levels,
            next_page_info: info.next,
        })
    }

    async fn get_orders(
        &self,
        created_at_min: DateTime<Utc>,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<Page<ShopifyOrder>> {
        let mut params = pagination_params(limit, page_info);
        params.push(("status", "any".to_owned()));
        params.push((
            "created_at_min",
            created_at_min.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
        params.push((
            "fields",
            "id,name,created_at,updated_at,financial_status,fulfillment_status,total_price,currency,cancelled_at,line_items"
                .to_owned(),
        ));

        let (response, info) = self.get::<OrdersResponse>("/orders.json", &params).await?;
        Ok(Page {
            items: response.orders,
            next_page_info: info.next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_for_normalized_domain() {
        let client = ShopifyClient::new("demo.myshopify.com", "shpat_example").unwrap();
        assert_eq!(client.shop_domain(), "demo.myshopify.com");
    }

    #[test]
    fn test_pagination_params() {
        assert_eq!(
            pagination_params(250, None),
            vec![("limit", "250".to_owned())]
        );
        assert_eq!(
            pagination_params(100, Some("cursor")),
            vec![
                ("limit", "100".to_owned()),
                ("page_info", "cursor".to_owned())
            ]
        );
        assert!(pagination_params(0, None).is_empty());
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[1, 2, 3]), "1,2,3");
        assert_eq!(join_ids(&[42]), "42");
        assert_eq!(join_ids(&[]), "");
    }

    #[test]
    fn test_platform_api_is_object_safe() {
        fn _assert(_: &dyn PlatformApi) {}
    }
}
