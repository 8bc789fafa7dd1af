//! Integer-keyed map split into independently locked shards.
//!
//! A key lives in shard `key mod shard_count`. Every operation takes at
//! most one shard lock at a time, so threads touching different shards
//! never wait on each other.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Integer keys that can pick their own shard.
pub trait ShardKey: Copy + Ord {
    fn shard_index(&self, shard_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(
            impl ShardKey for $t {
                fn shard_index(&self, shard_count: usize) -> usize {
                    (*self as i128).rem_euclid(shard_count as i128) as usize
                }
            }
        )*
    };
}

impl_shard_key!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

#[derive(Debug)]
pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V> ConcurrentMap<K, V> {
    /// A zero shard count is treated as one shard.
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        Self { shards: (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect() }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        &self.shards[key.shard_index(self.shards.len())]
    }

    /// Exclusive handle to the value for `key`, inserting `V::default()` if
    /// absent. The shard stays locked until the handle is dropped.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V>
    where
        V: Default,
    {
        MutexGuard::map(self.shard(&key).lock(), |map| map.entry(key).or_default())
    }

    pub fn erase(&self, key: &K) -> Option<V> {
        self.shard(key).lock().remove(key)
    }

    /// Copy every entry out, one shard lock at a time. Not an atomic
    /// snapshot across shards, but each value is read under its own lock.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut result = BTreeMap::new();
        for shard in &self.shards {
            let guard = shard.lock();
            result.extend(guard.iter().map(|(k, v)| (*k, v.clone())));
        }
        result
    }

    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        self.shards.into_iter().flat_map(|shard| shard.into_inner()).collect()
    }
}
