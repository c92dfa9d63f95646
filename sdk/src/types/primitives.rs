//! Identifier types for the QuickBite SDK.
//!
//! The backend hands out opaque string identifiers. Each entity gets its own
//! wrapper so an order id can never be passed where a menu item id is
//! expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SdkError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = SdkError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(SdkError::InvalidId(s.to_string()));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identity key of an order.
    OrderId
);
string_id!(
    /// Identifier of a customer account.
    CustomerId
);
string_id!(
    /// Identifier of a restaurant.
    RestaurantId
);
string_id!(
    /// Identifier of a driver account.
    DriverId
);
string_id!(
    /// Identifier of a menu item.
    MenuItemId
);
string_id!(
    /// Identifier of a menu item add-on.
    AddonId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = OrderId::new("ord_1");
        assert_eq!(id.to_string(), "ord_1");
        assert_eq!(id.as_str(), "ord_1");
    }

    #[test]
    fn test_id_from_str_trims() {
        let id: MenuItemId = " item-9 ".parse().expect("parse");
        assert_eq!(id.as_str(), "item-9");
    }

    #[test]
    fn test_id_from_str_rejects_blank() {
        assert!("   ".parse::<AddonId>().is_err());
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = RestaurantId::new("r1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"r1\"");
        let back: RestaurantId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_ordering() {
        let a = AddonId::new("a");
        let b = AddonId::new("b");
        assert!(a < b);
    }
}
