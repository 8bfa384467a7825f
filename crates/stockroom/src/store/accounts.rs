//! Lookups and writes for users, shops, and credentials.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entity::prelude::*;
use crate::id::{CredentialId, ShopId, UserId};

use super::errors::Result;

/// Find a user by id.
pub async fn find_user<C: ConnectionTrait>(
    conn: &C,
    user_id: &UserId,
) -> Result<Option<UserModel>> {
    Ok(User::find_by_id(user_id.clone()).one(conn).await?)
}

/// Find a shop by its normalized domain.
pub async fn find_shop_by_domain<C: ConnectionTrait>(
    conn: &C,
    domain: &str,
) -> Result<Option<ShopModel>> {
    Ok(Shop::find()
        .filter(ShopColumn::Domain.eq(domain))
        .one(conn)
        .await?)
}

/// Update platform-reported shop metadata in place.
pub async fn update_shop_metadata<C: ConnectionTrait>(
    conn: &C,
    shop_id: &ShopId,
    display_name: Option<String>,
    timezone: Option<String>,
    currency: Option<String>,
) -> Result<()> {
    let model = ShopActiveModel {
        id: Set(shop_id.clone()),
        display_name: Set(display_name),
        timezone: Set(timezone),
        currency: Set(currency),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    Shop::update(model).exec(conn).await?;
    Ok(())
}

/// Find the credential binding a user to a shop.
pub async fn find_credential<C: ConnectionTrait>(
    conn: &C,
    user_id: &UserId,
    shop_id: &ShopId,
) -> Result<Option<PlatformCredentialModel>> {
    Ok(PlatformCredential::find()
        .filter(PlatformCredentialColumn::UserId.eq(user_id.clone()))
        .filter(PlatformCredentialColumn::ShopId.eq(shop_id.clone()))
        .one(conn)
        .await?)
}

/// Find any credential for a shop that carries a token.
///
/// Used by workers that were handed an empty payload token and must
/// re-resolve one; any connected user's token will do.
pub async fn find_credential_for_shop<C: ConnectionTrait>(
    conn: &C,
    shop_id: &ShopId,
) -> Result<Option<PlatformCredentialModel>> {
    let credentials = PlatformCredential::find()
        .filter(PlatformCredentialColumn::ShopId.eq(shop_id.clone()))
        .all(conn)
        .await?;
    Ok(credentials
        .into_iter()
        .find(|credential| !credential.access_token.is_empty()))
}

/// Upsert a credential on its (user, shop) key.
///
/// `access_token` must already be the encrypted envelope; this layer never
/// sees plaintext tokens.
pub async fn upsert_credential<C: ConnectionTrait>(
    conn: &C,
    user_id: &UserId,
    shop_id: &ShopId,
    access_token: String,
    scope: Option<String>,
) -> Result<()> {
    let now = Utc::now();
    let model = PlatformCredentialActiveModel {
        id: Set(CredentialId::generate()),
        user_id: Set(user_id.clone()),
        shop_id: Set(shop_id.clone()),
        access_token: Set(access_token),
        scope: Set(scope),
        expires_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    PlatformCredential::insert(model)
        .on_conflict(
            OnConflict::columns([
                PlatformCredentialColumn::UserId,
                PlatformCredentialColumn::ShopId,
            ])
            .update_columns([
                PlatformCredentialColumn::AccessToken,
                PlatformCredentialColumn::Scope,
                PlatformCredentialColumn::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
