//! Typed account ID for type-safe references.
//!
//! Account ids are assigned outside this system and arrive as plain
//! integers; the wrapper keeps `from` and `to` ids from being swapped
//! silently in transfer plumbing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an account row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Creates an ID from a raw integer.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner integer.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Whether the id is in the valid (positive) range.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_value_roundtrip() {
        let id = AccountId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(AccountId::from(42), id);
    }

    #[test]
    fn test_account_id_positivity() {
        assert!(AccountId::new(1).is_positive());
        assert!(!AccountId::new(0).is_positive());
        assert!(!AccountId::new(-7).is_positive());
    }

    #[test]
    fn test_account_id_ordering() {
        assert!(AccountId::new(2) < AccountId::new(3));
        assert_eq!(AccountId::new(5).min(AccountId::new(9)), AccountId::new(5));
    }

    #[test]
    fn test_account_id_serde_transparent() {
        let id: AccountId = serde_json::from_str("17").unwrap();
        assert_eq!(id, AccountId::new(17));
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }

    #[test]
    fn test_account_id_display() {
        assert_eq!(AccountId::new(123).to_string(), "123");
    }
}
