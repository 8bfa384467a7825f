//! PlatformCredential entity - an encrypted access-token record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::{CredentialId, ShopId, UserId};

/// Binds a user to a shop and carries the access token.
///
/// `access_token` holds the `v1:` envelope produced by
/// [`crate::crypto::SecretCipher`]; the plaintext exists only in process
/// memory during a sync and is never logged. One credential per (user, shop).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platform_credentials")]
pub struct Model {
    /// Typed primary key (`crd_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: CredentialId,

    pub user_id: UserId,
    pub shop_id: ShopId,

    /// Encrypted access token envelope. Empty means no token granted.
    #[sea_orm(column_type = "Text")]
    pub access_token: String,

    /// Scope string granted with the token.
    pub scope: Option<String>,

    /// Token expiry, when the platform reports one.
    pub expires_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::shop::Entity",
        from = "Column::ShopId",
        to = "super::shop::Column::Id",
        on_delete = "Cascade"
    )]
    Shop,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::shop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
