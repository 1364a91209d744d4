use parking_lot::RwLock;
use std::collections::HashMap;

/// A string-keyed map guarded by a reader/writer lock.
///
/// Readers share the lock and never block each other. A writer waits for all
/// in-flight readers and writers to release, so no read ever observes a
/// partially written entry. A `get` that starts after a `set` has returned
/// sees that value or a later one. A `get` that overlaps a `set` may see
/// either the old or the new value.
///
/// The lock is private; callers only ever go through [`Self::get`] and
/// [`Self::set`].
#[derive(Debug)]
pub struct KeyedStore<V = i64> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> KeyedStore<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces `key` under the exclusive lock.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.entries.write().insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V> Default for KeyedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> KeyedStore<V> {
    /// Returns a copy of the value under the shared lock, or `None` if the
    /// key has never been set.
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.read().get(key).cloned()
    }
}
