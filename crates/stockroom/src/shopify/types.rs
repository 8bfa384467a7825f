//! Raw payload shapes returned by the Shopify Admin API.
//!
//! Deserialization is tolerant: unknown fields are ignored and most fields
//! default when absent, so API additions never break a sync.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Shop metadata from `GET /shop.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub iana_timezone: String,
}

/// A stock location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyLocation {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub active: Option<bool>,
}

/// A product, with its variants embedded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyProduct {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

/// A product variant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyVariant {
    pub id: i64,
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub sku: String,
    /// Decimal price rendered as a string by the platform.
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub inventory_item_id: i64,
    #[serde(default)]
    pub inventory_quantity: i32,
}

/// An inventory item backing a variant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyInventoryItem {
    pub id: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub tracked: bool,
    /// Decimal cost rendered as a string by the platform; may be absent.
    #[serde(default)]
    pub cost: String,
}

/// Stock on hand for one (item, location) pair.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyInventoryLevel {
    #[serde(default)]
    pub inventory_item_id: i64,
    #[serde(default)]
    pub location_id: i64,
    /// Null when the item is stocked but untracked at this location.
    #[serde(default)]
    pub available: Option<i32>,
}

/// An order, with its line items embedded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyOrder {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub financial_status: String,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    /// Decimal total rendered as a string by the platform.
    #[serde(default)]
    pub total_price: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
}

/// An order line item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyLineItem {
    pub id: i64,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub variant_id: Option<i64>,
    #[serde(default)]
    pub quantity: i32,
    /// Decimal price rendered as a string by the platform.
    #[serde(default)]
    pub price: String,
}

// Response envelopes. The Admin API wraps every collection in a named field.

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShopResponse {
    #[serde(default)]
    pub shop: ShopInfo,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LocationsResponse {
    #[serde(default)]
    pub locations: Vec<ShopifyLocation>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<ShopifyProduct>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InventoryItemsResponse {
    #[serde(default)]
    pub inventory_items: Vec<ShopifyInventoryItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InventoryLevelsResponse {
    #[serde(default)]
    pub inventory_levels: Vec<ShopifyInventoryLevel>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<ShopifyOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_decodes_with_embedded_variants() {
        let body = r#"{
            "products": [{
                "id": 1001,
                "title": "Mug",
                "handle": "mug",
                "product_type": "Kitchen",
                "status": "active",
                "some_future_field": {"nested": true},
                "variants": [
                    {"id": 2001, "product_id": 1001, "sku": "MUG-S", "price": "12.50", "inventory_item_id": 3001},
                    {"id": 2002, "product_id": 1001, "sku": "MUG-L", "price": "14.00", "inventory_item_id": 3002}
                ]
            }]
        }"#;

        let decoded: ProductsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.products.len(), 1);
        let product = &decoded.products[0];
        assert_eq!(product.handle, "mug");
        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.variants[0].price, "12.50");
    }

    #[test]
    fn order_tolerates_null_fulfillment_and_missing_fields() {
        let body = r#"{
            "orders": [{
                "id": 5001,
                "created_at": "2025-01-10T12:00:00Z",
                "financial_status": "paid",
                "fulfillment_status": null,
                "total_price": "99.99",
                "line_items": [{"id": 7001, "product_id": 1001, "quantity": 2, "price": "12.50"}]
            }]
        }"#;

        let decoded: OrdersResponse = serde_json::from_str(body).unwrap();
        let order = &decoded.orders[0];
        assert_eq!(order.fulfillment_status, None);
        assert_eq!(order.line_items[0].quantity, 2);
        assert!(order.cancelled_at.is_none());
        assert_eq!(order.currency, "");
    }

    #[test]
    fn inventory_level_tolerates_null_available() {
        let body = r#"{"inventory_levels": [{"inventory_item_id": 1, "location_id": 2, "available": null}]}"#;
        let decoded: InventoryLevelsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.inventory_levels[0].available, None);
    }
}
