use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for portfolio entities (holdings, transactions,
/// watchlist items, alerts) and catalog assets.
///
/// Catalog assets use human-chosen slugs ("aapl", "btc"); everything else
/// gets a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Id {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(Id::new(), Id::new());
    }

    #[test]
    fn test_from_string_keeps_value() {
        let id = Id::from_string("aapl");
        assert_eq!(id.as_str(), "aapl");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = Id::from_string("holding-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""holding-1""#);
    }
}
