//! Order fulfillment status, as a closed set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fulfillment state of an order.
///
/// The platform reports this as nullable; the column is nullable too, and
/// unknown external values collapse to null rather than to a guessed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[sea_orm(string_value = "fulfilled")]
    Fulfilled,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "restocked")]
    Restocked,
}

impl FulfillmentStatus {
    /// Map a platform-supplied nullable status into the closed set.
    pub fn from_external(value: Option<&str>) -> Option<Self> {
        match value {
            Some("fulfilled") => Some(FulfillmentStatus::Fulfilled),
            Some("partial") => Some(FulfillmentStatus::Partial),
            Some("restocked") => Some(FulfillmentStatus::Restocked),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_map_directly() {
        assert_eq!(
            FulfillmentStatus::from_external(Some("fulfilled")),
            Some(FulfillmentStatus::Fulfilled)
        );
        assert_eq!(
            FulfillmentStatus::from_external(Some("partial")),
            Some(FulfillmentStatus::Partial)
        );
        assert_eq!(
            FulfillmentStatus::from_external(Some("restocked")),
            Some(FulfillmentStatus::Restocked)
        );
    }

    #[test]
    fn null_and_unknown_collapse_to_none() {
        assert_eq!(FulfillmentStatus::from_external(None), None);
        assert_eq!(FulfillmentStatus::from_external(Some("shipped")), None);
    }
}
