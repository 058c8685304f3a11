//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create string-backed ID wrappers that
//! prevent accidentally mixing IDs from different record stores.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Accessors: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use till_core::define_id;
/// define_id!(VendorId);
/// define_id!(ExpenseId);
///
/// let vendor = VendorId::new("v-1");
/// let expense = ExpenseId::new("v-1");
/// assert_eq!(vendor.as_str(), expense.as_str());
///
/// // These are different types, so this won't compile:
/// // let _: VendorId = expense;
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
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(&self.0)
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

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Record-store IDs referenced by the core
define_id!(ProductId);
define_id!(OrderId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_is_transparent() {
        let id = ProductId::new("sku-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sku-42\"");

        let parsed: ProductId = serde_json::from_str("\"sku-42\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display_and_conversions() {
        let id = OrderId::from("ORD-123456");
        assert_eq!(id.to_string(), "ORD-123456");
        assert_eq!(String::from(id.clone()), "ORD-123456");
        assert_eq!(id.as_ref(), "ORD-123456");
    }
}
