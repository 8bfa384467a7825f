//! Shop entity - a storefront on an external platform.
//!
//! Shops are identified by their normalized external domain and exist
//! independently of the users who connect them; disconnecting a user leaves
//! the shop (and any synced data) in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::id::ShopId;

/// Shop model, keyed by the platform domain.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shops")]
pub struct Model {
    /// Typed primary key (`shp_`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ShopId,

    /// Normalized platform domain (e.g. `demo.myshopify.com`).
    #[sea_orm(unique)]
    pub domain: String,

    /// Display name reported by the platform.
    pub display_name: Option<String>,

    /// IANA timezone reported by the platform.
    pub timezone: Option<String>,

    /// ISO currency code reported by the platform.
    pub currency: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::platform_credential::Entity")]
    PlatformCredentials,
    #[sea_orm(has_many = "super::platform_integration::Entity")]
    PlatformIntegrations,
}

impl Related<super::platform_credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformCredentials.def()
    }
}

impl Related<super::platform_integration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlatformIntegrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
