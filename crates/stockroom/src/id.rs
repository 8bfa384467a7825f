//! Typed, prefixed identifiers.
//!
//! Every persisted row carries an opaque string id of the form
//! `<prefix>_<suffix>`, where the prefix names the entity type and the suffix
//! is a 20-character sortable [`xid`]. The prefix is tied to the Rust type via
//! a phantom marker, so a `ProductId` cannot be confused with an `OrderId` at
//! compile time, and the prefix is re-validated whenever an id enters the
//! process: on construction, on JSON deserialization, and on database read.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use sea_orm::sea_query::{ArrayType, ColumnType, Nullable, StringLen, ValueType, ValueTypeErr};
use sea_orm::{ColIdx, DbErr, QueryResult, TryFromU64, TryGetError, TryGetable, Value};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string does not parse as an id of the expected type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// The value does not start with the prefix required by the target type.
    #[error("invalid id `{value}`: expected prefix `{expected}_`")]
    InvalidPrefix {
        value: String,
        expected: &'static str,
    },

    /// The value has the right prefix but no suffix.
    #[error("invalid id `{value}`: missing suffix")]
    MissingSuffix { value: String },
}

/// Marker trait binding an entity type to its id prefix.
pub trait ResourceKind {
    /// The id prefix, without the trailing underscore.
    const PREFIX: &'static str;
}

macro_rules! resource_kinds {
    ($($(#[$doc:meta])* $name:ident => $prefix:literal as $alias:ident),+ $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug)]
            pub enum $name {}

            impl ResourceKind for $name {
                const PREFIX: &'static str = $prefix;
            }

            pub type $alias = Id<$name>;
        )+
    };
}

resource_kinds! {
    /// An authenticated principal.
    UserResource => "usr" as UserId,
    /// A storefront on an external platform.
    ShopResource => "shp" as ShopId,
    /// An encrypted access-token record binding a user to a shop.
    CredentialResource => "crd" as CredentialId,
    /// The synchronization unit: one shop on one platform.
    IntegrationResource => "int" as IntegrationId,
    /// A physical or logical stock location.
    LocationResource => "loc" as LocationId,
    /// A product.
    ProductResource => "prd" as ProductId,
    /// A product variant.
    VariantResource => "var" as VariantId,
    /// An inventory item backing a variant.
    InventoryItemResource => "inv" as InventoryItemId,
    /// A per-location inventory level.
    InventoryLevelResource => "ivl" as InventoryLevelId,
    /// An order.
    OrderResource => "ord" as OrderId,
    /// An order line item.
    LineItemResource => "oli" as LineItemId,
    /// A sync-state row.
    SyncStateResource => "syc" as SyncStateId,
}

/// An opaque, prefixed identifier for a resource of kind `K`.
pub struct Id<K: ResourceKind> {
    value: String,
    marker: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Id<K> {
    /// Generate a fresh id with a time-ordered suffix.
    pub fn generate() -> Self {
        Self {
            value: format!("{}_{}", K::PREFIX, xid::new()),
            marker: PhantomData,
        }
    }

    /// Parse an id, validating the prefix for kind `K`.
    pub fn parse(value: &str) -> Result<Self, IdError> {
        let Some(suffix) = value
            .strip_prefix(K::PREFIX)
            .and_then(|rest| rest.strip_prefix('_'))
        else {
            return Err(IdError::InvalidPrefix {
                value: value.to_owned(),
                expected: K::PREFIX,
            });
        };
        if suffix.is_empty() {
            return Err(IdError::MissingSuffix {
                value: value.to_owned(),
            });
        }
        Ok(Self {
            value: value.to_owned(),
            marker: PhantomData,
        })
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume the id, returning the underlying string.
    pub fn into_string(self) -> String {
        self.value
    }
}

impl<K: ResourceKind> Clone for Id<K> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            marker: PhantomData,
        }
    }
}

impl<K: ResourceKind> fmt::Debug for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<K: ResourceKind> fmt::Display for Id<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<K: ResourceKind> PartialEq for Id<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: ResourceKind> Eq for Id<K> {}

impl<K: ResourceKind> PartialOrd for Id<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: ResourceKind> Ord for Id<K> {
    // Suffixes are time-ordered, so string order is creation order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K: ResourceKind> Hash for Id<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K: ResourceKind> FromStr for Id<K> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<K: ResourceKind> Serialize for Id<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, K: ResourceKind> Deserialize<'de> for Id<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

// ─── sea-orm integration ─────────────────────────────────────────────────────
//
// Ids are stored as plain strings; the impls below let entity models use the
// typed wrapper directly while enforcing the prefix check on every read.

impl<K: ResourceKind> From<Id<K>> for Value {
    fn from(id: Id<K>) -> Self {
        Value::String(Some(Box::new(id.value)))
    }
}

impl<K: ResourceKind> TryGetable for Id<K> {
    fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
        let raw = <String as TryGetable>::try_get_by(res, index)?;
        Self::parse(&raw).map_err(|e| TryGetError::DbErr(DbErr::Type(e.to_string())))
    }
}

impl<K: ResourceKind> ValueType for Id<K> {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        match v {
            Value::String(Some(s)) => Self::parse(&s).map_err(|_| ValueTypeErr),
            _ => Err(ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "Id".to_owned()
    }

    fn array_type() -> ArrayType {
        ArrayType::String
    }

    fn column_type() -> ColumnType {
        ColumnType::String(StringLen::None)
    }
}

impl<K: ResourceKind> Nullable for Id<K> {
    fn null() -> Value {
        Value::String(None)
    }
}

impl<K: ResourceKind> TryFromU64 for Id<K> {
    fn try_from_u64(_: u64) -> Result<Self, DbErr> {
        Err(DbErr::ConvertFromU64("prefixed ids are not numeric"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_carries_the_kind_prefix() {
        let id = ProductId::generate();
        assert!(id.as_str().starts_with("prd_"));
        // xid suffixes are always 20 characters
        assert_eq!(id.as_str().len(), "prd_".len() + 20);
    }

    #[test]
    fn parse_accepts_matching_prefix() {
        let id = ProductId::generate();
        let reparsed = ProductId::parse(id.as_str()).expect("round-trip should parse");
        assert_eq!(id, reparsed);
    }

    #[test]
    fn parse_rejects_wrong_prefix() {
        let id = ProductId::generate();
        let err = OrderId::parse(id.as_str()).expect_err("prefix mismatch must fail");
        assert!(matches!(err, IdError::InvalidPrefix { expected: "ord", .. }));
    }

    #[test]
    fn parse_rejects_missing_suffix() {
        assert_eq!(
            ProductId::parse("prd_"),
            Err(IdError::MissingSuffix {
                value: "prd_".to_owned()
            })
        );
        assert!(matches!(
            ProductId::parse("prd"),
            Err(IdError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn generated_ids_sort_by_creation_order() {
        let first = OrderId::generate();
        let second = OrderId::generate();
        assert!(first <= second);
    }

    #[test]
    fn serde_round_trip_validates_prefix() {
        let id = IntegrationId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: IntegrationId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        let bad: Result<IntegrationId, _> = serde_json::from_str("\"prd_c8v4health000000000a\"");
        assert!(bad.is_err());
    }

    #[test]
    fn value_type_round_trip() {
        let id = ShopId::generate();
        let value: Value = id.clone().into();
        let back = <ShopId as ValueType>::try_from(value).unwrap();
        assert_eq!(id, back);

        let wrong = Value::String(Some(Box::new("ord_c8v4health000000000a".to_owned())));
        assert!(<ShopId as ValueType>::try_from(wrong).is_err());
    }
}
