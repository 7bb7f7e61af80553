//! Shared Cache Module
//!
//! Thread-safe facade over [`CacheStore`]. Every public operation holds one
//! exclusive lock for its whole duration, including any eviction scans, and
//! releases it on every exit path when the guard drops. `get` takes the
//! same exclusive lock because it restamps the entry.

use std::sync::{Mutex, MutexGuard};

use tracing::{info, warn};

use crate::cache::hash::clock_seed;
use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache ==
/// Fixed-budget LRU cache for opaque byte keys and values.
///
/// Share it between threads behind an `Arc`. Creation and [`destroy`]
/// need no lock since they take the handle by value.
///
/// [`destroy`]: Cache::destroy
#[derive(Debug)]
pub struct Cache {
    inner: Mutex<CacheStore>,
}

impl Cache {
    // == Create ==
    /// Creates a cache with a `total_bytes` budget and a clock-derived seed.
    ///
    /// `average_item_bytes` only sizes the bucket array
    /// (`total_bytes / average_item_bytes` buckets); it does not limit
    /// individual values.
    pub fn create(total_bytes: u64, average_item_bytes: u64) -> Result<Self> {
        Self::with_seed(total_bytes, average_item_bytes, clock_seed())
    }

    /// Creates a cache with a fixed hash seed, for reproducible layouts.
    pub fn with_seed(total_bytes: u64, average_item_bytes: u64, seed: u32) -> Result<Self> {
        let store = CacheStore::new(total_bytes, average_item_bytes, seed)?;
        info!(
            "Cache created: budget={} bytes, buckets={}, seed={}",
            total_bytes,
            store.bucket_count(),
            seed
        );
        Ok(Self {
            inner: Mutex::new(store),
        })
    }

    /// Creates a cache from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.hash_seed {
            Some(seed) => Self::with_seed(config.cache_size, config.average_item_size, seed),
            None => Self::create(config.cache_size, config.average_item_size),
        }
    }

    // == Set ==
    /// Stores `value` under `key`. The cache becomes sole owner of both
    /// buffers; an existing value for `key` is dropped.
    ///
    /// May evict least recently used entries, one O(n) scan each, until
    /// the value fits.
    pub fn set(&self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<()> {
        self.lock()?.set(key.into(), value.into())
    }

    // == Get ==
    /// Returns an owned copy of the value for `key`, marking it as used.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.get_with(key, <[u8]>::to_vec)
    }

    /// Runs `f` on a borrowed view of the value for `key`, marking it as
    /// used.
    ///
    /// The view aliases cache-owned memory and is only valid inside `f`,
    /// which runs while the lock is held. Keep `f` short; a panic inside it
    /// poisons the cache.
    pub fn get_with<R>(&self, key: &[u8], f: impl FnOnce(&[u8]) -> R) -> Result<Option<R>> {
        let mut store = self.lock()?;
        Ok(store.get(key)?.map(f))
    }

    /// True when `key` is resident. Does not count as a use.
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.lock()?.peek(key).is_some())
    }

    // == Delete ==
    /// Removes `key`. Deleting a missing key succeeds and does nothing.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.lock()?.delete(key)?;
        Ok(())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> Result<CacheStats> {
        Ok(self.lock()?.stats())
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Remaining byte budget.
    pub fn free_memory(&self) -> Result<u64> {
        Ok(self.lock()?.free_memory())
    }

    /// Budget ceiling.
    pub fn total_memory(&self) -> Result<u64> {
        Ok(self.lock()?.total_memory())
    }

    /// Sum of live value lengths, computed by walking every chain.
    pub fn used_memory(&self) -> Result<u64> {
        Ok(self.lock()?.used_memory())
    }

    // == Destroy ==
    /// Releases every entry, the free list, the bucket array and the lock.
    ///
    /// Consumes the handle so it cannot be used afterwards. Fails with
    /// `Synchronization` when the lock was poisoned; the memory is still
    /// released in that case.
    pub fn destroy(self) -> Result<()> {
        let store = self.inner.into_inner().map_err(|poisoned| {
            let released = poisoned.into_inner().destroy();
            warn!("Cache destroyed with a poisoned lock, released {} entries", released);
            CacheError::Synchronization("cache lock was poisoned".to_string())
        })?;
        let released = store.destroy();
        info!("Cache destroyed, released {} entries", released);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheStore>> {
        self.inner.lock().map_err(|_| {
            warn!("Cache lock is poisoned");
            CacheError::Synchronization("cache lock was poisoned".to_string())
        })
    }
}
