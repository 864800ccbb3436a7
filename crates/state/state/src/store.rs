use std::time::Duration;

use async_trait::async_trait;

use crate::error::StateError;
use crate::key::{Collection, DocKey};
use glimpse_core::OwnerId;

/// Result of a bounded counter increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundedIncrement {
    /// The counter was below the ceiling; the increment was applied and
    /// `count` is the new value.
    Accepted { count: i64 },
    /// The counter had already reached the ceiling; nothing was written and
    /// `count` is the unchanged value.
    CeilingHit { count: i64 },
}

impl BoundedIncrement {
    /// The counter value after the operation, whether or not it changed.
    #[must_use]
    pub fn count(&self) -> i64 {
        match self {
            Self::Accepted { count } | Self::CeilingHit { count } => *count,
        }
    }

    /// Whether the increment was applied.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Trait for persisting Glimpse documents and counters.
///
/// Values are schemaless strings (JSON documents by convention); queries
/// beyond this trait — owner filters, ordering, limits — are applied by
/// repositories over [`scan`](DocumentStore::scan) results.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get the value for a key. Returns `None` if not found or expired.
    async fn get(&self, key: &DocKey) -> Result<Option<String>, StateError>;

    /// Set a value with an optional TTL, overwriting any previous value.
    async fn put(&self, key: &DocKey, value: &str, ttl: Option<Duration>)
    -> Result<(), StateError>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &DocKey) -> Result<bool, StateError>;

    /// Atomically increment a counter by `delta`. Returns the new value.
    /// Creates the counter at 0 if it doesn't exist before incrementing.
    async fn increment(
        &self,
        key: &DocKey,
        delta: i64,
        ttl: Option<Duration>,
    ) -> Result<i64, StateError>;

    /// Atomically increment a counter by `delta` only while the result stays
    /// at or below `ceiling`.
    ///
    /// The check and the write happen as one atomic step in the backend, so
    /// concurrent callers can never drive the counter past the ceiling. A
    /// missing counter starts at 0. `ttl` applies when the increment is
    /// accepted.
    async fn increment_below(
        &self,
        key: &DocKey,
        delta: i64,
        ceiling: i64,
        ttl: Option<Duration>,
    ) -> Result<BoundedIncrement, StateError>;

    /// Scan the documents of a collection, optionally restricted to one
    /// owner.
    ///
    /// Returns `(id, value)` pairs in unspecified order; callers sort.
    /// This operation may be expensive on some backends. Use sparingly.
    async fn scan(
        &self,
        collection: &Collection,
        owner: Option<&OwnerId>,
    ) -> Result<Vec<(String, String)>, StateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_increment_count() {
        assert_eq!(BoundedIncrement::Accepted { count: 3 }.count(), 3);
        assert_eq!(BoundedIncrement::CeilingHit { count: 10 }.count(), 10);
    }

    #[test]
    fn bounded_increment_acceptance() {
        assert!(BoundedIncrement::Accepted { count: 1 }.is_accepted());
        assert!(!BoundedIncrement::CeilingHit { count: 10 }.is_accepted());
    }
}
