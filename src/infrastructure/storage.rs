//! Storage implementation for per-identity limiter state.
//!
//! Provides a concurrent, sharded map so that operations on different
//! identities proceed in parallel while operations on the same identity are
//! serialized by its shard lock.

use dashmap::DashMap;
use std::hash::Hash;

/// Thread-safe sharded storage backed by DashMap with ahash hashing.
///
/// DashMap provides lock-free reads and fine-grained locking for writes.
/// Access is closure-based: the shard lock is held for the duration of the
/// closure, which gives the per-identity atomicity the limiters rely on
/// without exposing guard types.
#[derive(Debug)]
pub struct ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    map: DashMap<K, V, ahash::RandomState>,
}

impl<K, V> ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new sharded storage instance.
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Insert or update a value.
    pub fn insert(&self, key: K, value: V) {
        self.map.insert(key, value);
    }

    /// Read an existing entry through a closure.
    ///
    /// Returns `None` without invoking the closure if the key is absent.
    pub fn read_entry<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.map.get(key).map(|guard| f(guard.value()))
    }

    /// Mutate an existing entry through a closure.
    ///
    /// Returns `None` without invoking the closure if the key is absent.
    /// The shard write lock is held for the duration of the closure.
    pub fn update_entry<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R,
    {
        self.map.get_mut(key).map(|mut guard| f(guard.value_mut()))
    }

    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// The shard write lock is held for the whole call, so the factory and
    /// accessor together form one atomic step for this key.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    /// * `factory` - Function to create a new value if the key doesn't exist
    /// * `accessor` - Function that gets mutable access to the value
    pub fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        let entry = self.map.entry(key);
        let mut value_ref = entry.or_insert_with(factory);
        accessor(&mut value_ref)
    }

    /// Check if a key exists.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Remove a key and return its value.
    pub fn remove(&self, key: &K) -> Option<(K, V)> {
        self.map.remove(key)
    }

    /// Remove a key only if its value satisfies the predicate.
    ///
    /// The predicate runs under the shard write lock, so the value cannot
    /// change between the test and the removal. Returns true if the entry
    /// was removed.
    pub fn remove_if(&self, key: &K, predicate: impl FnOnce(&K, &V) -> bool) -> bool {
        self.map.remove_if(key, predicate).is_some()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.map.clear();
    }

    /// Retain only the entries that satisfy the predicate.
    pub fn retain(&self, f: impl FnMut(&K, &mut V) -> bool) {
        self.map.retain(f);
    }
}

impl<K, V> Default for ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let storage = ShardedStorage::new();

        storage.insert("key1", 100);
        storage.insert("key2", 200);

        assert_eq!(storage.read_entry(&"key1", |v| *v), Some(100));
        assert_eq!(storage.read_entry(&"key2", |v| *v), Some(200));
        assert_eq!(storage.read_entry(&"key3", |v| *v), None);

        assert_eq!(storage.len(), 2);
        assert!(!storage.is_empty());
    }

    #[test]
    fn test_update_entry() {
        let storage = ShardedStorage::new();
        storage.insert("key", 100);

        let result = storage.update_entry(&"key", |v| {
            *v += 1;
            *v
        });
        assert_eq!(result, Some(101));

        // Absent keys are not created
        assert_eq!(storage.update_entry(&"missing", |v: &mut i32| *v), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_with_entry_mut_creates_missing() {
        let storage: ShardedStorage<&str, u32> = ShardedStorage::new();

        let result = storage.with_entry_mut(
            "key",
            || 10,
            |v| {
                *v += 1;
                *v
            },
        );
        assert_eq!(result, 11);

        // Existing entry is reused, not recreated
        let result = storage.with_entry_mut("key", || 10, |v| *v);
        assert_eq!(result, 11);
    }

    #[test]
    fn test_remove_if() {
        let storage = ShardedStorage::new();
        storage.insert("key", 5);

        assert!(!storage.remove_if(&"key", |_, v| *v > 10));
        assert!(storage.contains_key(&"key"));

        assert!(storage.remove_if(&"key", |_, v| *v == 5));
        assert!(!storage.contains_key(&"key"));

        // Removing a missing key is a no-op
        assert!(!storage.remove_if(&"key", |_, _| true));
    }

    #[test]
    fn test_remove() {
        let storage = ShardedStorage::new();
        storage.insert("key", 100);

        assert_eq!(storage.remove(&"key"), Some(("key", 100)));
        assert_eq!(storage.remove(&"key"), None);
    }

    #[test]
    fn test_clear_and_retain() {
        let storage = ShardedStorage::new();
        for i in 0..10 {
            storage.insert(i, i * 10);
        }

        storage.retain(|k, _| k % 2 == 0);
        assert_eq!(storage.len(), 5);

        storage.clear();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let storage = Arc::new(ShardedStorage::new());
        let mut handles = vec![];

        for i in 0..10 {
            let storage = Arc::clone(&storage);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    storage.insert(format!("key_{}_{}", i, j), i * 100 + j);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.len(), 1000);
    }
}
