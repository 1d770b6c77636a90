//! # Entity Cache
//!
//! Per-entity-kind memoization of loaded instances.
//!
//! ## Coherence Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cache Coherence                                      │
//! │                                                                         │
//! │  READ PATH                            WRITE PATH                        │
//! │                                                                         │
//! │  load(id)                             update/insert-line/delete(id)     │
//! │    │                                    │                               │
//! │    ├── cache hit? ── return the         ├── execute SQL                 │
//! │    │   same Arc as last time            │                               │
//! │    │                                    └── invalidate(id)              │
//! │    └── miss? ── query, put,                                             │
//! │        return the stored Arc          next load(id) re-reads the        │
//! │                                       just-committed state              │
//! │                                                                         │
//! │  Identity guarantee: two loads of the same id with no intervening       │
//! │  invalidation hand back pointer-equal Arcs.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Populated on first read, invalidated on write, cleared only at process
//! restart. The cache is owned by its repository, not by any static map,
//! so dropping the `Database` drops every cache with it.
//!
//! The internal mutex exists only because the async runtime may resume a
//! task on a different thread. It does NOT make check-then-write sequences
//! atomic across callers; the system assumes a single writer throughout.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Id-keyed memoization store for loaded entities.
///
/// Cloning the cache is cheap and yields a handle to the same underlying
/// map, so repository clones stay coherent with each other.
#[derive(Debug)]
pub struct EntityCache<T> {
    entries: Arc<Mutex<HashMap<i64, Arc<T>>>>,
}

impl<T> EntityCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        EntityCache {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the cached instance for `id`, if present.
    pub fn get(&self, id: i64) -> Option<Arc<T>> {
        self.lock().get(&id).cloned()
    }

    /// Inserts (or overwrites) the entry for `id` and returns the shared
    /// handle that subsequent `get` calls will also return.
    pub fn put(&self, id: i64, entity: T) -> Arc<T> {
        let entity = Arc::new(entity);
        self.lock().insert(id, Arc::clone(&entity));
        entity
    }

    /// Removes the entry for `id`, forcing the next read to reload.
    pub fn invalidate(&self, id: i64) {
        self.lock().remove(&id);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Locks the map, absorbing poison: a panic elsewhere must not wedge
    /// every later read.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, Arc<T>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        EntityCache::new()
    }
}

/// Manual impl: clones share the same map regardless of whether `T` itself
/// is cloneable.
impl<T> Clone for EntityCache<T> {
    fn clone(&self) -> Self {
        EntityCache {
            entries: Arc::clone(&self.entries),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_identical_instance() {
        let cache: EntityCache<String> = EntityCache::new();
        let stored = cache.put(1, "first".to_string());

        let a = cache.get(1).unwrap();
        let b = cache.get(1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &stored));
    }

    #[test]
    fn test_invalidate_forces_miss() {
        let cache: EntityCache<String> = EntityCache::new();
        cache.put(1, "first".to_string());

        cache.invalidate(1);
        assert!(cache.get(1).is_none());

        // invalidating an absent id is a no-op
        cache.invalidate(99);
    }

    #[test]
    fn test_put_overwrites() {
        let cache: EntityCache<String> = EntityCache::new();
        let old = cache.put(1, "old".to_string());
        cache.put(1, "new".to_string());

        let current = cache.get(1).unwrap();
        assert_eq!(*current, "new");
        assert!(!Arc::ptr_eq(&old, &current));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache: EntityCache<i32> = EntityCache::new();
        let handle = cache.clone();

        cache.put(1, 10);
        assert_eq!(handle.get(1).map(|v| *v), Some(10));

        handle.invalidate(1);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_clear_and_len() {
        let cache: EntityCache<i32> = EntityCache::new();
        assert!(cache.is_empty());

        cache.put(1, 10);
        cache.put(2, 20);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
