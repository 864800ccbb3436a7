use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use glimpse_core::OwnerId;
use glimpse_state::error::StateError;
use glimpse_state::key::{Collection, DocKey};
use glimpse_state::store::{BoundedIncrement, DocumentStore};

/// A single entry in the in-memory store.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    /// Returns `true` if this entry has passed its TTL deadline.
    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Compute the expiry instant from an optional TTL duration.
fn expiry_from_ttl(ttl: Option<Duration>) -> Option<Instant> {
    ttl.map(|d| Instant::now() + d)
}

fn parse_counter(value: &str) -> Result<i64, StateError> {
    value.parse().map_err(|e: std::num::ParseIntError| {
        StateError::Serialization(format!("counter value is not an integer: {e}"))
    })
}

/// In-memory [`DocumentStore`] backed by a [`DashMap`].
///
/// Entries are lazily evicted on read when their TTL has elapsed. This
/// implementation is fully synchronous internally; the async trait methods
/// return immediately. Counter mutations go through the map's entry API,
/// which holds the shard lock across the read-modify-write, making
/// [`increment`](DocumentStore::increment) and
/// [`increment_below`](DocumentStore::increment_below) atomic.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    data: DashMap<String, Entry>,
}

impl MemoryDocumentStore {
    /// Create a new, empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a [`DocKey`] into the string used as the map key.
    fn render_key(key: &DocKey) -> String {
        key.canonical()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &DocKey) -> Result<Option<String>, StateError> {
        let rendered = Self::render_key(key);

        // Lazy TTL eviction: check and remove if expired.
        if let Some(entry) = self.data.get(&rendered) {
            if entry.is_expired() {
                drop(entry);
                self.data.remove(&rendered);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }

        Ok(None)
    }

    async fn put(
        &self,
        key: &DocKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StateError> {
        let rendered = Self::render_key(key);
        let expires_at = expiry_from_ttl(ttl);

        self.data
            .entry(rendered)
            .and_modify(|entry| {
                value.clone_into(&mut entry.value);
                entry.expires_at = expires_at;
            })
            .or_insert_with(|| Entry {
                value: value.to_owned(),
                expires_at,
            });

        Ok(())
    }

    async fn delete(&self, key: &DocKey) -> Result<bool, StateError> {
        let rendered = Self::render_key(key);

        // Remove, but treat expired entries as "not found".
        match self.data.remove(&rendered) {
            Some((_, entry)) => Ok(!entry.is_expired()),
            None => Ok(false),
        }
    }

    async fn increment(
        &self,
        key: &DocKey,
        delta: i64,
        ttl: Option<Duration>,
    ) -> Result<i64, StateError> {
        let rendered = Self::render_key(key);
        let expires_at = expiry_from_ttl(ttl);

        // Remove any expired entry first so the counter starts fresh.
        self.data.remove_if(&rendered, |_, entry| entry.is_expired());

        let mut ref_mut = self.data.entry(rendered).or_insert_with(|| Entry {
            value: "0".to_owned(),
            expires_at,
        });

        let new_value = parse_counter(&ref_mut.value)? + delta;
        ref_mut.value = new_value.to_string();
        if let Some(ea) = expires_at {
            ref_mut.expires_at = Some(ea);
        }

        Ok(new_value)
    }

    async fn increment_below(
        &self,
        key: &DocKey,
        delta: i64,
        ceiling: i64,
        ttl: Option<Duration>,
    ) -> Result<BoundedIncrement, StateError> {
        let rendered = Self::render_key(key);
        let expires_at = expiry_from_ttl(ttl);

        self.data.remove_if(&rendered, |_, entry| entry.is_expired());

        // The entry API holds the shard lock across check and write, so the
        // ceiling can never be exceeded by concurrent callers.
        match self.data.entry(rendered) {
            dashmap::mapref::entry::Entry::Occupied(mut occupied) => {
                let current = parse_counter(&occupied.get().value)?;
                let next = current + delta;
                if next > ceiling {
                    return Ok(BoundedIncrement::CeilingHit { count: current });
                }
                let entry = occupied.get_mut();
                entry.value = next.to_string();
                if let Some(ea) = expires_at {
                    entry.expires_at = Some(ea);
                }
                Ok(BoundedIncrement::Accepted { count: next })
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                if delta > ceiling {
                    return Ok(BoundedIncrement::CeilingHit { count: 0 });
                }
                vacant.insert(Entry {
                    value: delta.to_string(),
                    expires_at,
                });
                Ok(BoundedIncrement::Accepted { count: delta })
            }
        }
    }

    async fn scan(
        &self,
        collection: &Collection,
        owner: Option<&OwnerId>,
    ) -> Result<Vec<(String, String)>, StateError> {
        let prefix = match owner {
            Some(owner) => format!("{collection}:{owner}:"),
            None => format!("{collection}:"),
        };

        let mut results = Vec::new();
        for item in &self.data {
            if item.value().is_expired() {
                continue;
            }
            let Some(rest) = item.key().strip_prefix(&prefix) else {
                continue;
            };
            // Without an owner filter the remainder is `owner:id`.
            let id = match owner {
                Some(_) => rest,
                None => rest.split_once(':').map_or(rest, |(_, id)| id),
            };
            results.push((id.to_owned(), item.value().value.clone()));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glimpse_state::key::{Collection, DocKey};
    use glimpse_state::testing::run_store_conformance_tests;

    use super::*;

    fn test_key(collection: Collection, id: &str) -> DocKey {
        DocKey::new(collection, "test-owner", id)
    }

    #[tokio::test]
    async fn conformance() {
        let store = MemoryDocumentStore::new();
        run_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_expiry_via_get() {
        let store = MemoryDocumentStore::new();
        let key = test_key(Collection::Dashboards, "ttl-expire");

        store
            .put(&key, "short-lived", Some(Duration::from_secs(5)))
            .await
            .unwrap();

        // Value should be present before TTL elapses.
        let val = store.get(&key).await.unwrap();
        assert_eq!(val.as_deref(), Some("short-lived"));

        // Advance time past TTL.
        tokio::time::advance(Duration::from_secs(6)).await;

        // Lazy eviction: get should return None.
        let val = store.get(&key).await.unwrap();
        assert!(val.is_none(), "value should be expired");
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_increment_resets_after_expiry() {
        let store = MemoryDocumentStore::new();
        let key = test_key(Collection::UploadCounters, "ttl-counter");

        store
            .increment(&key, 10, Some(Duration::from_secs(2)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;

        // After expiry the counter should restart from zero.
        let val = store.increment(&key, 1, None).await.unwrap();
        assert_eq!(val, 1, "counter should reset after TTL expiry");
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_bounded_increment_resets_after_expiry() {
        let store = MemoryDocumentStore::new();
        let key = test_key(Collection::UploadCounters, "ttl-bounded");

        let result = store
            .increment_below(&key, 1, 1, Some(Duration::from_secs(60)))
            .await
            .unwrap();
        assert!(result.is_accepted());
        let result = store.increment_below(&key, 1, 1, None).await.unwrap();
        assert!(!result.is_accepted(), "ceiling reached before expiry");

        tokio::time::advance(Duration::from_secs(61)).await;

        let result = store.increment_below(&key, 1, 1, None).await.unwrap();
        assert!(result.is_accepted(), "expired counter starts fresh");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn bounded_increment_never_exceeds_ceiling_under_contention() {
        let store = std::sync::Arc::new(MemoryDocumentStore::new());
        let key = test_key(Collection::UploadCounters, "contended");
        let ceiling = 10;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = std::sync::Arc::clone(&store);
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                store.increment_below(&key, 1, ceiling, None).await.unwrap()
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_accepted() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, ceiling, "exactly `ceiling` attempts may win");
        let val = store.get(&key).await.unwrap();
        assert_eq!(val.as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn delete_returns_false_for_missing() {
        let store = MemoryDocumentStore::new();
        let key = test_key(Collection::Articles, "never-set");
        let existed = store.delete(&key).await.unwrap();
        assert!(!existed);
    }

    #[tokio::test]
    async fn scan_skips_expired_entries() {
        let store = MemoryDocumentStore::new();
        let live = test_key(Collection::Dashboards, "live");
        let dead = test_key(Collection::Dashboards, "dead");

        store.put(&live, "a", None).await.unwrap();
        store
            .put(&dead, "b", Some(Duration::from_nanos(1)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let entries = store
            .scan(&Collection::Dashboards, Some(&"test-owner".into()))
            .await
            .unwrap();
        assert!(entries.iter().any(|(id, _)| id == "live"));
        assert!(entries.iter().all(|(id, _)| id != "dead"));
    }
}
