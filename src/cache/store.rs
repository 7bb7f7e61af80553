//! Cache Store Module
//!
//! Unsynchronized cache engine: bucket table, node pool, access stamps and
//! the value-byte budget. [`Cache`](crate::cache::Cache) wraps it in a
//! mutex for shared use.

use tracing::{debug, warn};

use crate::cache::lru::evict_least_recent;
use crate::cache::{BucketTable, CacheStats, Lookup, NodePool};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Fixed-budget key/value store with approximate LRU eviction.
///
/// Only value bytes are charged to the budget. At every point outside a
/// method call `free_memory + used_memory() == total_memory`.
#[derive(Debug)]
pub struct CacheStore {
    /// Chains of live entries
    table: BucketTable,
    /// Node arena and free list
    pool: NodePool,
    /// Last access stamp handed out
    access_count: u64,
    /// Remaining byte budget
    free_memory: u64,
    /// Budget ceiling
    total_memory: u64,
    /// Expected item size the table was sized for
    item_length: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store with a `total_memory` byte budget.
    ///
    /// The bucket array gets `total_memory / item_length` buckets, rounded
    /// down, and never grows. `item_length` does not cap individual values.
    ///
    /// # Arguments
    /// * `total_memory` - Total byte budget for live values
    /// * `item_length` - Expected average item size
    /// * `seed` - Hash seed for this store
    pub fn new(total_memory: u64, item_length: u64, seed: u32) -> Result<Self> {
        if item_length == 0 {
            return Err(CacheError::InvalidConfig(
                "average item size must be non-zero".to_string(),
            ));
        }

        let buckets = usize::try_from(total_memory / item_length).map_err(|_| {
            CacheError::Allocation(format!(
                "{} buckets do not fit in memory",
                total_memory / item_length
            ))
        })?;
        if buckets == 0 {
            return Err(CacheError::InvalidConfig(format!(
                "budget of {} bytes is smaller than the average item size of {} bytes",
                total_memory, item_length
            )));
        }

        Ok(Self {
            table: BucketTable::new(buckets, seed)?,
            pool: NodePool::new(),
            access_count: 0,
            free_memory: total_memory,
            total_memory,
            item_length,
            stats: CacheStats::new(),
        })
    }

    // == Set ==
    /// Stores `value` under `key`, taking ownership of both buffers.
    ///
    /// An existing key keeps its key buffer and has its value replaced; the
    /// previous value is dropped. When the new bytes do not fit, least
    /// recently used entries are evicted one full table scan at a time until
    /// they do.
    ///
    /// Keys and values are arbitrary bytes; either may be empty.
    ///
    /// # Errors
    /// * `ValueTooLarge` - `value` is longer than the whole budget
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let new_length = value.len() as u64;
        if new_length > self.total_memory {
            warn!(
                "Rejecting value of {} bytes, budget is {} bytes",
                new_length, self.total_memory
            );
            return Err(CacheError::ValueTooLarge {
                size: new_length,
                budget: self.total_memory,
            });
        }

        let bucket = self.table.bucket_of(&key);
        let (index, released) = match self.table.find(&self.pool, bucket, &key) {
            Lookup::Found { index, .. } => {
                let previous = self.pool.get_mut(index).replace_value(value);
                (index, previous.len() as u64)
            }
            Lookup::Missing { tail } => {
                let index = self.pool.acquire(key, value);
                self.table.append(&mut self.pool, bucket, tail, index);
                (index, 0)
            }
        };
        let stamp = self.next_stamp();
        self.pool.get_mut(index).access_count = stamp;

        if new_length <= released {
            self.free_memory += released - new_length;
            return Ok(());
        }

        let required = new_length - released;
        while self.free_memory < required {
            // The entry just stamped is the newest, so it is only picked
            // once nothing else is left, which cannot happen while the
            // value fits the budget.
            match evict_least_recent(&mut self.table, &mut self.pool) {
                Some((victim, freed)) => {
                    self.free_memory += freed;
                    self.stats.record_eviction();
                    debug!(
                        "Evicted entry with stamp {} from bucket {}, freed {} bytes",
                        victim.access_count, victim.bucket, freed
                    );
                }
                None => {
                    return Err(CacheError::ValueTooLarge {
                        size: new_length,
                        budget: self.total_memory,
                    })
                }
            }
        }
        self.free_memory -= required;

        Ok(())
    }

    // == Get ==
    /// Looks up `key` and stamps it as most recently used.
    ///
    /// The returned slice borrows cache-owned memory; the borrow checker
    /// ends it before the next mutating call, which is exactly when the
    /// entry may be evicted, deleted or updated. Misses change nothing
    /// but the miss counter.
    pub fn get(&mut self, key: &[u8]) -> Result<Option<&[u8]>> {
        let bucket = self.table.bucket_of(key);
        match self.table.find(&self.pool, bucket, key) {
            Lookup::Found { index, .. } => {
                self.stats.record_hit();
                let stamp = self.next_stamp();
                let entry = self.pool.get_mut(index);
                entry.access_count = stamp;
                Ok(Some(entry.value.as_slice()))
            }
            Lookup::Missing { .. } => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    // == Peek ==
    /// Looks up `key` without touching its stamp or the hit/miss counters.
    pub fn peek(&self, key: &[u8]) -> Option<&[u8]> {
        let bucket = self.table.bucket_of(key);
        match self.table.find(&self.pool, bucket, key) {
            Lookup::Found { index, .. } => Some(self.pool.get(index).value.as_slice()),
            Lookup::Missing { .. } => None,
        }
    }

    // == Delete ==
    /// Removes `key`, crediting its value length back to the budget.
    ///
    /// Deleting a missing key is a no-op. Returns whether an entry was
    /// removed.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        let bucket = self.table.bucket_of(key);
        match self.table.find(&self.pool, bucket, key) {
            Lookup::Found { prev, index } => {
                self.table.unlink(&mut self.pool, bucket, prev, index);
                let freed = self.pool.release(index);
                self.free_memory += freed;
                debug!("Deleted entry from bucket {}, freed {} bytes", bucket, freed);
                Ok(true)
            }
            Lookup::Missing { .. } => Ok(false),
        }
    }

    // == Destroy ==
    /// Releases every entry, the free list and the bucket array.
    ///
    /// Returns the number of live entries that were dropped.
    pub fn destroy(mut self) -> usize {
        let released = self.pool.live();
        self.table.clear();
        self.pool.clear();
        released
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.pool.live(),
            recycled_nodes: self.pool.free(),
            buckets: self.table.len(),
            free_memory: self.free_memory,
            total_memory: self.total_memory,
            ..self.stats.clone()
        }
    }

    // == Used Memory ==
    /// Sums the value lengths of every live entry by walking all chains.
    pub fn used_memory(&self) -> u64 {
        (0..self.table.len())
            .flat_map(|bucket| self.table.chain(&self.pool, bucket))
            .map(|index| self.pool.get(index).value_length())
            .sum()
    }

    /// Remaining byte budget.
    pub fn free_memory(&self) -> u64 {
        self.free_memory
    }

    /// Budget ceiling.
    pub fn total_memory(&self) -> u64 {
        self.total_memory
    }

    /// Expected average item size the table was sized for.
    pub fn item_length(&self) -> u64 {
        self.item_length
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.table.len()
    }

    /// Seed used to hash keys into buckets.
    pub fn seed(&self) -> u32 {
        self.table.seed()
    }

    /// Last access stamp handed out.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.pool.live()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.pool.live() == 0
    }

    fn next_stamp(&mut self) -> u64 {
        self.access_count += 1;
        self.access_count
    }
}
