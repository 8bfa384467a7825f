//! Product status, as a closed set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product lifecycle status.
///
/// External values outside the closed set collapse to `draft`, the most
/// conservative state for forecasting purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "archived")]
    Archived,
    #[sea_orm(string_value = "draft")]
    Draft,
}

impl ProductStatus {
    /// Map a platform-supplied status string into the closed set.
    pub fn from_external(value: &str) -> Self {
        match value {
            "active" => ProductStatus::Active,
            "archived" => ProductStatus::Archived,
            "draft" => ProductStatus::Draft,
            _ => ProductStatus::Draft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_map_directly() {
        assert_eq!(ProductStatus::from_external("active"), ProductStatus::Active);
        assert_eq!(
            ProductStatus::from_external("archived"),
            ProductStatus::Archived
        );
        assert_eq!(ProductStatus::from_external("draft"), ProductStatus::Draft);
    }

    #[test]
    fn unknown_values_collapse_to_draft() {
        assert_eq!(ProductStatus::from_external(""), ProductStatus::Draft);
        assert_eq!(
            ProductStatus::from_external("discontinued"),
            ProductStatus::Draft
        );
    }
}
