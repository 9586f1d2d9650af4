//! Sharded LRU of identifiers keyed by encoded value bytes.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use super::Identifier;
use crate::codec::EncodedForm;
use crate::primitives::hash::hash16;

/// Sharded LRU map from encoded values to their identifiers.
pub struct IdCache {
    shards: Vec<Mutex<LruCache<EncodedForm, Identifier>>>,
}

impl IdCache {
    /// Splits `capacity` entries evenly across `shards` (both at least 1).
    pub fn new(shards: usize, capacity: usize) -> Self {
        let shard_count = shards.max(1);
        let per_shard_cap = NonZeroUsize::new((capacity / shard_count).max(1)).unwrap_or(NonZeroUsize::MIN);
        let mut shard_vec = Vec::with_capacity(shard_count);
        for _ in 0..shard_count {
            shard_vec.push(Mutex::new(LruCache::new(per_shard_cap)));
        }
        Self { shards: shard_vec }
    }

    pub fn get(&self, key: &EncodedForm) -> Option<Identifier> {
        let mut guard = self.shard_for(key).lock();
        guard.get(key).cloned()
    }

    pub fn insert(&self, key: EncodedForm, id: Identifier) {
        let mut guard = self.shard_for(&key).lock();
        guard.put(key, id);
    }

    /// Entries currently held across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: &EncodedForm) -> &Mutex<LruCache<EncodedForm, Identifier>> {
        let idx = hash16(key.as_bytes()) as usize % self.shards.len();
        &self.shards[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(s: &str) -> EncodedForm {
        let mut bytes = vec![0x20];
        bytes.extend_from_slice(s.as_bytes());
        EncodedForm::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn evicts_per_shard() {
        let cache = IdCache::new(1, 2);
        let id = Identifier::from_slice(&[1, 2, 3]);
        cache.insert(form("a"), id.clone());
        cache.insert(form("b"), id.clone());
        cache.insert(form("c"), id.clone());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&form("a")).is_none());
        assert_eq!(cache.get(&form("c")), Some(id));
    }

    #[test]
    fn zero_sizes_are_clamped() {
        let cache = IdCache::new(0, 0);
        assert_eq!(cache.shard_count(), 1);
        cache.insert(form("x"), Identifier::from_slice(&[9]));
        assert_eq!(cache.len(), 1);
    }
}
