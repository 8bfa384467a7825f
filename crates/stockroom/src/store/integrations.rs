//! Platform integration lookups and creation.

use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entity::prelude::*;
use crate::id::{IntegrationId, ShopId};

use super::errors::{Result, StoreError};

/// Find an integration by id.
pub async fn find_integration<C: ConnectionTrait>(
    conn: &C,
    integration_id: &IntegrationId,
) -> Result<Option<PlatformIntegrationModel>> {
    Ok(PlatformIntegration::find_by_id(integration_id.clone())
        .one(conn)
        .await?)
}

/// Find the integration for a shop and platform kind.
pub async fn find_integration_by_shop<C: ConnectionTrait>(
    conn: &C,
    shop_id: &ShopId,
    kind: PlatformKind,
) -> Result<Option<PlatformIntegrationModel>> {
    Ok(PlatformIntegration::find()
        .filter(PlatformIntegrationColumn::ShopId.eq(shop_id.clone()))
        .filter(PlatformIntegrationColumn::PlatformKind.eq(kind))
        .one(conn)
        .await?)
}

/// Get or create the integration for (shop, platform kind).
///
/// `platform_shop_id` is the external-side shop identifier (the normalized
/// domain for Shopify). A concurrent creator losing the race falls back to
/// re-reading the winner's row; the (platform_shop_id, platform_kind) unique
/// key guarantees there is exactly one.
pub async fn get_or_create_integration<C: ConnectionTrait>(
    conn: &C,
    shop_id: &ShopId,
    kind: PlatformKind,
    platform_shop_id: &str,
) -> Result<PlatformIntegrationModel> {
    if let Some(existing) = find_integration_by_shop(conn, shop_id, kind).await? {
        return Ok(existing);
    }

    let now = Utc::now();
    let model = PlatformIntegrationActiveModel {
        id: Set(IntegrationId::generate()),
        shop_id: Set(shop_id.clone()),
        platform_kind: Set(kind),
        platform_shop_id: Set(platform_shop_id.to_owned()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(err) = PlatformIntegration::insert(model)
        .exec_without_returning(conn)
        .await
    {
        // Either lost the race to a concurrent trigger or a real failure;
        // the re-read distinguishes the two.
        if let Some(existing) = find_integration_by_shop(conn, shop_id, kind).await? {
            return Ok(existing);
        }
        return Err(err.into());
    }

    find_integration_by_shop(conn, shop_id, kind)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("integration for shop {shop_id}")))
}
