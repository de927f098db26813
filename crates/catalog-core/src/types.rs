//! # Domain Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Product                                         │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  id          i64       store-assigned, 0 while transient               │
//! │  name        String                                                    │
//! │  price       Money     decimal on the wire, INTEGER cents in SQLite    │
//! │  createdAt   DateTime  stamped when staged for insert                  │
//! │  updatedAt   DateTime  stamped when staged for insert or update        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::entity::{Entity, EntityId};
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
///
/// Request bodies may omit `id` and the timestamps; they default to a
/// transient id and the Unix epoch, and are filled in when the product is
/// staged and saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    #[serde(default)]
    pub id: EntityId,

    /// Display name.
    pub name: String,

    /// Unit price.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(type = "number")]
    pub price: Money,

    #[serde(default)]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a transient product.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Product {
            id: 0,
            name: name.into(),
            price,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl Entity for Product {
    const NAME: &'static str = "Product";

    fn id(&self) -> EntityId {
        self.id
    }

    fn on_added(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
        self.updated_at = at;
    }

    fn on_modified(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_body() {
        let product: Product = serde_json::from_str(r#"{"name":"A","price":1.0}"#).unwrap();

        assert!(product.is_transient());
        assert_eq!(product.name, "A");
        assert_eq!(product.price, Money::from_cents(100));
    }

    #[test]
    fn test_serialize_camel_case() {
        let product = Product::new("Widget", Money::from_cents(250));
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["price"], 2.5);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_lifecycle_hooks() {
        let mut product = Product::new("Widget", Money::from_cents(250));
        let added = Utc::now();
        product.on_added(added);
        assert_eq!(product.created_at, added);
        assert_eq!(product.updated_at, added);

        let modified = added + chrono::Duration::seconds(5);
        product.on_modified(modified);
        assert_eq!(product.created_at, added);
        assert_eq!(product.updated_at, modified);
    }
}
