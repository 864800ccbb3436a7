use std::time::Duration;

use crate::error::StateError;
use crate::key::{Collection, DocKey};
use crate::store::{BoundedIncrement, DocumentStore};

fn test_key(collection: Collection, id: &str) -> DocKey {
    DocKey::new(collection, "test-owner", id)
}

/// Run the full document store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_store_conformance_tests(store: &dyn DocumentStore) -> Result<(), StateError> {
    test_get_missing(store).await?;
    test_put_and_get(store).await?;
    test_put_overwrites(store).await?;
    test_delete(store).await?;
    test_increment(store).await?;
    test_increment_below_ceiling(store).await?;
    test_increment_below_release(store).await?;
    test_ttl_put(store).await?;
    test_scan_owner_isolation(store).await?;
    test_scan_collection_isolation(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::Dashboards, "missing");
    let val = store.get(&key).await?;
    assert!(val.is_none(), "get on missing key should return None");
    Ok(())
}

async fn test_put_and_get(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::Dashboards, "put-get");
    store.put(&key, "hello", None).await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("hello"));
    Ok(())
}

async fn test_put_overwrites(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::Articles, "overwrite");
    store.put(&key, "v1", None).await?;
    store.put(&key, "v2", None).await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("v2"), "last writer should win");
    Ok(())
}

async fn test_delete(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::Articles, "to-delete");
    store.put(&key, "bye", None).await?;
    let existed = store.delete(&key).await?;
    assert!(existed, "delete should return true for existing key");
    let val = store.get(&key).await?;
    assert!(val.is_none(), "get after delete should return None");

    let existed = store.delete(&key).await?;
    assert!(!existed, "delete on missing key should return false");
    Ok(())
}

async fn test_increment(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::UploadCounters, "counter-1");
    let val = store.increment(&key, 1, None).await?;
    assert_eq!(val, 1, "first increment from zero should yield 1");

    let val = store.increment(&key, 5, None).await?;
    assert_eq!(val, 6, "second increment should accumulate");

    let val = store.increment(&key, -2, None).await?;
    assert_eq!(val, 4, "negative delta should decrement");
    Ok(())
}

async fn test_increment_below_ceiling(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::UploadCounters, "bounded-1");

    for expected in 1..=3 {
        let result = store.increment_below(&key, 1, 3, None).await?;
        assert_eq!(
            result,
            BoundedIncrement::Accepted { count: expected },
            "increments below the ceiling should be accepted"
        );
    }

    let result = store.increment_below(&key, 1, 3, None).await?;
    assert_eq!(
        result,
        BoundedIncrement::CeilingHit { count: 3 },
        "increment at the ceiling should be refused without writing"
    );

    let val = store.get(&key).await?;
    assert_eq!(
        val.as_deref(),
        Some("3"),
        "refused increment must not change the stored counter"
    );
    Ok(())
}

async fn test_increment_below_release(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::UploadCounters, "bounded-2");

    let result = store.increment_below(&key, 1, 1, None).await?;
    assert!(result.is_accepted());
    let result = store.increment_below(&key, 1, 1, None).await?;
    assert!(!result.is_accepted());

    // A plain decrement frees capacity again.
    store.increment(&key, -1, None).await?;
    let result = store.increment_below(&key, 1, 1, None).await?;
    assert_eq!(result, BoundedIncrement::Accepted { count: 1 });
    Ok(())
}

async fn test_ttl_put(store: &dyn DocumentStore) -> Result<(), StateError> {
    let key = test_key(Collection::UploadCounters, "ttl-test");
    store
        .put(&key, "ephemeral", Some(Duration::from_secs(3600)))
        .await?;
    let val = store.get(&key).await?;
    assert_eq!(val.as_deref(), Some("ephemeral"));
    Ok(())
}

async fn test_scan_owner_isolation(store: &dyn DocumentStore) -> Result<(), StateError> {
    let mine = DocKey::new(Collection::Dashboards, "scan-owner-a", "d1");
    let theirs = DocKey::new(Collection::Dashboards, "scan-owner-b", "d2");
    store.put(&mine, "mine", None).await?;
    store.put(&theirs, "theirs", None).await?;

    let entries = store
        .scan(&Collection::Dashboards, Some(&"scan-owner-a".into()))
        .await?;
    assert!(
        entries.iter().any(|(id, v)| id == "d1" && v == "mine"),
        "owner scan should include the owner's documents"
    );
    assert!(
        entries.iter().all(|(id, _)| id != "d2"),
        "owner scan must not leak other owners' documents"
    );
    Ok(())
}

async fn test_scan_collection_isolation(store: &dyn DocumentStore) -> Result<(), StateError> {
    let article = DocKey::new(Collection::Articles, "scan-coll", "a1");
    let dashboard = DocKey::new(Collection::Dashboards, "scan-coll", "d1");
    store.put(&article, "article", None).await?;
    store.put(&dashboard, "dashboard", None).await?;

    let entries = store
        .scan(&Collection::Articles, Some(&"scan-coll".into()))
        .await?;
    assert!(entries.iter().any(|(id, _)| id == "a1"));
    assert!(
        entries.iter().all(|(id, _)| id != "d1"),
        "collection scan must not cross collections"
    );
    Ok(())
}
