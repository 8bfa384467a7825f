//! Chunked upserts and id maps for orders and line items.

use std::collections::HashMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use crate::entity::prelude::*;
use crate::id::{IntegrationId, OrderId};

use super::UPSERT_CHUNK_SIZE;
use super::errors::Result;

/// Upsert orders on their global `external_id`.
pub async fn upsert_orders<C: ConnectionTrait>(
    conn: &C,
    models: Vec<OrderActiveModel>,
) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }

    let on_conflict = OnConflict::column(OrderColumn::ExternalId)
        .update_columns([
            OrderColumn::FinancialStatus,
            OrderColumn::FulfillmentStatus,
            OrderColumn::TotalPrice,
            OrderColumn::Currency,
            OrderColumn::PlacedAt,
            OrderColumn::CancelledAt,
            OrderColumn::UpdatedAt,
        ])
        .to_owned();

    let mut written = 0u64;
    for chunk in models.chunks(UPSERT_CHUNK_SIZE) {
        written += Order::insert_many(chunk.to_vec())
            .on_conflict(on_conflict.clone())
            .exec_without_returning(conn)
            .await?;
    }
    Ok(written)
}

/// Map of order `external_id` to surviving row id for an integration.
pub async fn order_id_map<C: ConnectionTrait>(
    conn: &C,
    integration_id: &IntegrationId,
) -> Result<HashMap<String, OrderId>> {
    let rows: Vec<(OrderId, String)> = Order::find()
        .select_only()
        .column(OrderColumn::Id)
        .column(OrderColumn::ExternalId)
        .filter(OrderColumn::IntegrationId.eq(integration_id.clone()))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|(id, ext)| (ext, id)).collect())
}

/// Upsert line items on (order, external_id).
pub async fn upsert_line_items<C: ConnectionTrait>(
    conn: &C,
    models: Vec<OrderLineItemActiveModel>,
) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }

    let on_conflict = OnConflict::columns([
        OrderLineItemColumn::OrderId,
        OrderLineItemColumn::ExternalId,
    ])
    .update_columns([
        OrderLineItemColumn::ProductId,
        OrderLineItemColumn::Quantity,
        OrderLineItemColumn::Price,
        OrderLineItemColumn::UpdatedAt,
    ])
    .to_owned();

    let mut written = 0u64;
    for chunk in models.chunks(UPSERT_CHUNK_SIZE) {
        written += OrderLineItem::insert_many(chunk.to_vec())
            .on_conflict(on_conflict.clone())
            .exec_without_returning(conn)
            .await?;
    }
    Ok(written)
}
