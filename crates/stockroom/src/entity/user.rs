//! User entity - an authenticated principal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// User model. Owns zero or more platform credentials.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Typed primary key (`usr_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: UserId,

    /// Login email.
    #[sea_orm(unique)]
    pub email: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user owns credentials for the shops they connected.
    #[sea_orm(has_many = "super::platform_credential::Entity")]
    PlatformCredentials,
}

impl Related<super::platform_credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformCredentials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
