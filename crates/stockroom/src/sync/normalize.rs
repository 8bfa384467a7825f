//! Normalization of raw platform records into database rows.
//!
//! External numeric ids are rendered as decimal strings, enum values collapse
//! into the closed sets, and string-encoded decimals parse into `Decimal` -
//! a parse failure produces an unset value and a warning, never an abort.
//!
//! Child records come out as drafts carrying their parent's *external* id:
//! the parent's internal id is only known after the parent upsert resolves
//! which row survives, so the pipeline binds drafts to real foreign keys
//! between upserts.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::Set;

use crate::entity::prelude::*;
use crate::id::{
    IntegrationId, InventoryItemId, InventoryLevelId, LineItemId, LocationId, OrderId, ProductId,
    VariantId,
};
use crate::shopify::{
    ShopifyInventoryItem, ShopifyInventoryLevel, ShopifyLocation, ShopifyOrder, ShopifyProduct,
};

/// A variant row waiting for its parent product's internal id.
#[derive(Debug, Clone)]
pub struct VariantDraft {
    pub product_external_id: String,
    pub model: ProductVariantActiveModel,
}

/// An inventory level waiting for its item and location internal ids.
#[derive(Debug, Clone)]
pub struct LevelDraft {
    pub item_external_id: String,
    pub location_external_id: String,
    pub available: i32,
}

/// A line item waiting for its order's (and optionally product's) internal id.
#[derive(Debug, Clone)]
pub struct LineItemDraft {
    pub order_external_id: String,
    pub product_external_id: Option<String>,
    pub model: OrderLineItemActiveModel,
}

/// Parse a platform decimal string; empty means absent, garbage warns.
pub fn parse_decimal(raw: &str, entity: &str, external_id: i64) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    match Decimal::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                entity,
                external_id,
                value = raw,
                error = %err,
                "failed to parse decimal value"
            );
            None
        }
    }
}

/// Compose a single address line from the platform's address parts.
/// Empty parts are omitted; all-empty composes to `None`.
pub fn compose_address(address1: &str, address2: &str, city: &str) -> Option<String> {
    let parts: Vec<&str> = [address1, address2, city]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn opt(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Normalize locations.
pub fn normalize_locations(
    integration_id: &IntegrationId,
    raw: &[ShopifyLocation],
    now: DateTime<Utc>,
) -> Vec<LocationActiveModel> {
    raw.iter()
        .map(|location| LocationActiveModel {
            id: Set(LocationId::generate()),
            integration_id: Set(integration_id.clone()),
            external_id: Set(location.id.to_string()),
            name: Set(location.name.clone()),
            address: Set(compose_address(
                &location.address1,
                &location.address2,
                &location.city,
            )),
            country: Set(opt(&location.country)),
            province: Set(opt(&location.province)),
            is_active: Set(location.active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .collect()
}

/// Normalize products and their embedded variants.
pub fn normalize_products(
    integration_id: &IntegrationId,
    raw: &[ShopifyProduct],
    now: DateTime<Utc>,
) -> (Vec<ProductActiveModel>, Vec<VariantDraft>) {
    let mut products = Vec::with_capacity(raw.len());
    let mut variants = Vec::new();

    for product in raw {
        let external_id = product.id.to_string();
        products.push(ProductActiveModel {
            id: Set(ProductId::generate()),
            integration_id: Set(integration_id.clone()),
            external_id: Set(external_id.clone()),
            title: Set(product.title.clone()),
            handle: Set(product.handle.clone()),
            product_type: Set(opt(&product.product_type)),
            status: Set(ProductStatus::from_external(&product.status)),
            created_at: Set(now),
            updated_at: Set(now),
        });

        for variant in &product.variants {
            let inventory_item_external_id = if variant.inventory_item_id != 0 {
                Some(variant.inventory_item_id.to_string())
            } else {
                None
            };
            variants.push(VariantDraft {
                product_external_id: external_id.clone(),
                model: ProductVariantActiveModel {
                    id: Set(VariantId::generate()),
                    external_id: Set(variant.id.to_string()),
                    sku: Set(opt(&variant.sku)),
                    price: Set(parse_decimal(&variant.price, "product_variant", variant.id)),
                    inventory_item_external_id: Set(inventory_item_external_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                },
            });
        }
    }

    (products, variants)
}

/// Collect the unique inventory item ids referenced by variants, preserving
/// first-seen order.
pub fn collect_inventory_item_ids(products: &[ShopifyProduct]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for product in products {
        for variant in &product.variants {
            if variant.inventory_item_id != 0 && seen.insert(variant.inventory_item_id) {
                ids.push(variant.inventory_item_id);
            }
        }
    }
    ids
}

/// Normalize inventory items.
pub fn normalize_inventory_items(
    integration_id: &IntegrationId,
    raw: &[ShopifyInventoryItem],
    now: DateTime<Utc>,
) -> Vec<InventoryItemActiveModel> {
    raw.iter()
        .map(|item| InventoryItemActiveModel {
            id: Set(InventoryItemId::generate()),
            integration_id: Set(integration_id.clone()),
            external_id: Set(item.id.to_string()),
            sku: Set(opt(&item.sku)),
            tracked: Set(item.tracked),
            cost: Set(parse_decimal(&item.cost, "inventory_item", item.id)),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .collect()
}

/// Normalize inventory levels into drafts keyed by external ids.
pub fn normalize_inventory_levels(raw: &[ShopifyInventoryLevel]) -> Vec<LevelDraft> {
    raw.iter()
        .map(|level| LevelDraft {
            item_external_id: level.inventory_item_id.to_string(),
            location_external_id: level.location_id.to_string(),
            available: level.available.unwrap_or(0),
        })
        .collect()
}

/// Bind resolved ids onto a level draft.
pub fn level_model(
    draft: &LevelDraft,
    item_id: InventoryItemId,
    location_id: LocationId,
    now: DateTime<Utc>,
) -> InventoryLevelActiveModel {
    InventoryLevelActiveModel {
        id: Set(InventoryLevelId::generate()),
        inventory_item_id: Set(item_id),
        location_id: Set(location_id),
        available: Set(draft.available),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Normalize orders and their embedded line items.
pub fn normalize_orders(
    integration_id: &IntegrationId,
    raw: &[ShopifyOrder],
    now: DateTime<Utc>,
) -> (Vec<OrderActiveModel>, Vec<LineItemDraft>) {
    let mut orders = Vec::with_capacity(raw.len());
    let mut line_items = Vec::new();

    for order in raw {
        let external_id = order.id.to_string();
        orders.push(OrderActiveModel {
            id: Set(OrderId::generate()),
            integration_id: Set(integration_id.clone()),
            external_id: Set(external_id.clone()),
            financial_status: Set(FinancialStatus::from_external(&order.financial_status)),
            fulfillment_status: Set(FulfillmentStatus::from_external(
                order.fulfillment_status.as_deref(),
            )),
            total_price: Set(parse_decimal(&order.total_price, "order", order.id)),
            currency: Set(opt(&order.currency)),
            placed_at: Set(order.created_at.unwrap_or(now)),
            cancelled_at: Set(order.cancelled_at),
            created_at: Set(now),
            updated_at: Set(now),
        });

        for item in &order.line_items {
            line_items.push(LineItemDraft {
                order_external_id: external_id.clone(),
                product_external_id: item.product_id.map(|id| id.to_string()),
                model: OrderLineItemActiveModel {
                    id: Set(LineItemId::generate()),
                    external_id: Set(item.id.to_string()),
                    product_id: Set(None),
                    quantity: Set(item.quantity),
                    price: Set(parse_decimal(&item.price, "order_line_item", item.id)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                },
            });
        }
    }

    (orders, line_items)
}

#[cfg(test)]
mod tests {
    use crate::shopify::{ShopifyLineItem, ShopifyVariant};

    use super::*;

    #[test]
    fn parse_decimal_handles_valid_empty_and_garbage() {
        assert_eq!(
            parse_decimal("12.50", "test", 1),
            Some(Decimal::new(1250, 2))
        );
        assert_eq!(parse_decimal("", "test", 1), None);
        assert_eq!(parse_decimal("not-a-price", "test", 1), None);
    }

    #[test]
    fn compose_address_omits_empty_parts() {
        assert_eq!(
            compose_address("1 Main St", "Suite 4", "Springfield"),
            Some("1 Main St, Suite 4, Springfield".to_owned())
        );
        assert_eq!(
            compose_address("1 Main St", "", "Springfield"),
            Some("1 Main St, Springfield".to_owned())
        );
        assert_eq!(compose_address("", "", ""), None);
    }

    #[test]
    fn locations_render_external_id_as_decimal_string() {
        let integration_id = IntegrationId::generate();
        let raw = vec![ShopifyLocation {
            id: 9007199254740993,
            name: "Warehouse".to_owned(),
            ..Default::default()
        }];
        let models = normalize_locations(&integration_id, &raw, Utc::now());
        assert_eq!(models.len(), 1);
        assert_eq!(
            models[0].external_id,
            Set("9007199254740993".to_owned())
        );
    }

    #[test]
    fn unknown_product_status_collapses_to_draft() {
        let integration_id = IntegrationId::generate();
        let raw = vec![ShopifyProduct {
            id: 1,
            handle: "mug".to_owned(),
            status: "discontinued".to_owned(),
            ..Default::default()
        }];
        let (products, _) = normalize_products(&integration_id, &raw, Utc::now());
        assert_eq!(products[0].status, Set(ProductStatus::Draft));
    }

    #[test]
    fn variants_keep_their_parents_external_id() {
        let integration_id = IntegrationId::generate();
        let raw = vec![ShopifyProduct {
            id: 1001,
            handle: "mug".to_owned(),
            status: "active".to_owned(),
            variants: vec![
                ShopifyVariant {
                    id: 2001,
                    inventory_item_id: 3001,
                    price: "12.50".to_owned(),
                    ..Default::default()
                },
                ShopifyVariant {
                    id: 2002,
                    inventory_item_id: 0,
                    price: "bogus".to_owned(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];

        let (_, variants) = normalize_products(&integration_id, &raw, Utc::now());
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].product_external_id, "1001");
        assert_eq!(
            variants[0].model.inventory_item_external_id,
            Set(Some("3001".to_owned()))
        );
        // Untracked variant: no item reference; bad price: unset, not fatal.
        assert_eq!(variants[1].model.inventory_item_external_id, Set(None));
        assert_eq!(variants[1].model.price, Set(None));
    }

    #[test]
    fn inventory_item_ids_are_unique_in_first_seen_order() {
        let raw = vec![
            ShopifyProduct {
                id: 1,
                variants: vec![
                    ShopifyVariant {
                        inventory_item_id: 30,
                        ..Default::default()
                    },
                    ShopifyVariant {
                        inventory_item_id: 10,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            ShopifyProduct {
                id: 2,
                variants: vec![
                    ShopifyVariant {
                        inventory_item_id: 30,
                        ..Default::default()
                    },
                    ShopifyVariant {
                        inventory_item_id: 0,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        ];
        assert_eq!(collect_inventory_item_ids(&raw), vec![30, 10]);
    }

    #[test]
    fn orders_map_enums_into_closed_sets() {
        let integration_id = IntegrationId::generate();
        let raw = vec![ShopifyOrder {
            id: 5001,
            financial_status: "settled".to_owned(),
            fulfillment_status: Some("shipped".to_owned()),
            total_price: "99.99".to_owned(),
            line_items: vec![ShopifyLineItem {
                id: 7001,
                product_id: Some(1001),
                quantity: 2,
                price: "12.50".to_owned(),
                ..Default::default()
            }],
            ..Default::default()
        }];

        let (orders, line_items) = normalize_orders(&integration_id, &raw, Utc::now());
        // Unknown financial status -> pending; unknown fulfillment -> null.
        assert_eq!(orders[0].financial_status, Set(FinancialStatus::Pending));
        assert_eq!(orders[0].fulfillment_status, Set(None));
        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items[0].order_external_id, "5001");
        assert_eq!(line_items[0].product_external_id.as_deref(), Some("1001"));
    }
}
