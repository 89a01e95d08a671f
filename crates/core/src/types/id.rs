//! Newtype IDs for type-safe entity references.
//!
//! Catalog identifiers are opaque strings supplied by the product data, so
//! every ID wraps a `String`. Use the `define_id!` macro to create wrappers
//! that prevent accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Borrow<str>`
///
/// # Example
///
/// ```rust
/// # use amarine_core::define_id;
/// define_id!(PatternId);
/// define_id!(ThreadId);
///
/// let pattern = PatternId::new("12");
/// let thread = ThreadId::new("12");
///
/// assert_eq!(pattern.as_str(), thread.as_str());
/// // These are different types, so this won't compile:
/// // let _: PatternId = thread;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(ReviewId);
define_id!(OrderNumber);

impl ProductId {
    /// Numeric value of the ID, if the catalog uses numeric IDs.
    ///
    /// The catalog orders "newest first" by this value.
    #[must_use]
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_id_display_and_conversions() {
        let id = ProductId::from("p1");
        assert_eq!(id.to_string(), "p1");
        assert_eq!(id.as_str(), "p1");
        assert_eq!(ProductId::new(String::from("p1")), id);
        assert_eq!(id.into_inner(), "p1");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = CategoryId::new("flowers");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"flowers\""));

        let parsed: Option<CategoryId> = serde_json::from_str("\"flowers\"").ok();
        assert_eq!(parsed, Some(id));
    }

    #[test]
    fn test_id_borrow_allows_str_lookup() {
        let mut map = HashMap::new();
        map.insert(ProductId::from("7"), 3);
        assert_eq!(map.get("7"), Some(&3));
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(ProductId::from("12").numeric(), Some(12));
        assert_eq!(ProductId::from("rose-garden").numeric(), None);
    }
}
