//! Newtype IDs for type-safe entity references.
//!
//! Catalog ids come from the content system as opaque strings, so the
//! wrappers here hold a `String` rather than a database integer.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `Display`, `From<&str>` and `From<String>`
///
/// # Example
///
/// ```rust
/// # use emporium_core::define_id;
/// define_id!(CategoryId);
/// define_id!(PageId);
///
/// let category = CategoryId::new("electronics");
/// assert_eq!(category.as_str(), "electronics");
///
/// // These are different types, so this won't compile:
/// // let _: PageId = category;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);

/// Human-facing order reference, e.g. `ORD-1718000000000-042`.
///
/// Assigned once when an order is created and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Prefix shared by every generated order number.
    pub const PREFIX: &'static str = "ORD";

    /// Generate an order number from a creation timestamp and a random
    /// three-digit suffix.
    #[must_use]
    pub fn generate(created_at: DateTime<Utc>, rng: &mut impl Rng) -> Self {
        let suffix: u16 = rng.random_range(0..1000);
        Self(format!(
            "{}-{}-{suffix:03}",
            Self::PREFIX,
            created_at.timestamp_millis()
        ))
    }

    /// Wrap an existing order number (e.g. from a URL path).
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_product_id_serializes_transparently() {
        let id = ProductId::new("p1");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"p1\""));
        assert_eq!(id.to_string(), "p1");
    }

    #[test]
    fn test_order_number_format() {
        let created_at = Utc.timestamp_millis_opt(1_718_000_000_000).single();
        let Some(created_at) = created_at else {
            panic!("valid timestamp");
        };
        let mut rng = StdRng::seed_from_u64(7);
        let number = OrderNumber::generate(created_at, &mut rng);

        let parts: Vec<&str> = number.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.first(), Some(&"ORD"));
        assert_eq!(parts.get(1), Some(&"1718000000000"));
        assert_eq!(parts.get(2).map(|s| s.len()), Some(3));
    }
}
