//! World configuration.

use serde::{Deserialize, Serialize};

/// Where [`World::assign`](crate::World::assign) places a new entry.
///
/// Queries rely on every column being ascending by entity id. The policy
/// decides who is responsible for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Binary-search insert after any entries with the same id. Columns stay
    /// sorted whatever order ids arrive in.
    #[default]
    Sorted,
    /// Insert directly before the sentinel. Callers must assign ascending ids;
    /// out-of-order ids are stored anyway and logged.
    Append,
    /// Like [`Append`](Self::Append), but an out-of-order id is rejected.
    Strict,
}

impl OrderPolicy {
    /// Returns `true` if columns under this policy are always ascending.
    #[must_use]
    pub const fn keeps_order(self) -> bool {
        matches!(self, Self::Sorted | Self::Strict)
    }
}

/// Configuration for a [`World`](crate::World).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Insertion policy applied to every column.
    pub order: OrderPolicy,
    /// Entries reserved when a column is created, sentinel included.
    pub column_capacity: usize,
}

impl WorldConfig {
    /// Create the default config: sorted insertion, no preallocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the insertion policy.
    #[must_use]
    pub fn with_order(mut self, order: OrderPolicy) -> Self {
        self.order = order;
        self
    }

    /// Override the initial column capacity.
    #[must_use]
    pub fn with_column_capacity(mut self, capacity: usize) -> Self {
        self.column_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sorted() {
        let config = WorldConfig::new();
        assert_eq!(config.order, OrderPolicy::Sorted);
        assert_eq!(config.column_capacity, 0);
    }

    #[test]
    fn test_partial_json() {
        let config: WorldConfig = serde_json::from_str(r#"{ "order": "strict" }"#).unwrap();
        assert_eq!(config, WorldConfig::new().with_order(OrderPolicy::Strict));

        let config: WorldConfig = serde_json::from_str(r#"{ "column_capacity": 64 }"#).unwrap();
        assert_eq!(config.order, OrderPolicy::Sorted);
        assert_eq!(config.column_capacity, 64);
    }

    #[test]
    fn test_keeps_order() {
        assert!(OrderPolicy::Sorted.keeps_order());
        assert!(OrderPolicy::Strict.keeps_order());
        assert!(!OrderPolicy::Append.keeps_order());
    }
}
