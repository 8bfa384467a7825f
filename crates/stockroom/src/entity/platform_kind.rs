//! Platform kind enum for type-safe platform handling.
//!
//! This names the kind of external commerce platform, not a specific shop.
//! Shopify is the only kind implemented today; the enum keeps the schema and
//! the integration uniqueness key ready for further platforms.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supported external commerce platform kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PlatformKind {
    /// Shopify (`*.myshopify.com` shops).
    #[sea_orm(string_value = "shopify")]
    Shopify,
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Shopify => write!(f, "shopify"),
        }
    }
}

impl std::str::FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shopify" => Ok(PlatformKind::Shopify),
            _ => Err(format!("Unknown platform kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(PlatformKind::Shopify.to_string(), "shopify");
        assert_eq!(
            "Shopify".parse::<PlatformKind>().unwrap(),
            PlatformKind::Shopify
        );
        assert!("etsy".parse::<PlatformKind>().is_err());
    }
}
