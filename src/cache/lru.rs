//! LRU Eviction Module
//!
//! Approximate least-recently-used selection by access stamp.
//!
//! No recency list is maintained. Every eviction walks every bucket and
//! every chain to find the entry with the smallest stamp, so one eviction
//! costs O(live entries). This dominates `set` once the budget is full.

use crate::cache::{BucketTable, NodePool};

// == Victim ==
/// Location of the entry chosen for eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Victim {
    /// Bucket whose chain holds the entry
    pub bucket: usize,
    /// Predecessor in that chain, `None` when the entry is the head
    pub prev: Option<usize>,
    /// Pool index of the entry
    pub index: usize,
    /// Access stamp of the entry
    pub access_count: u64,
}

// == Find Least Recent ==
/// Scans the whole table for the entry with the smallest access stamp.
///
/// Ties keep the first entry met in bucket-then-chain order. Returns
/// `None` when the table holds no entries.
pub(crate) fn find_least_recent(table: &BucketTable, pool: &NodePool) -> Option<Victim> {
    let mut victim: Option<Victim> = None;

    for bucket in 0..table.len() {
        let mut prev = None;
        for index in table.chain(pool, bucket) {
            let access_count = pool.get(index).access_count;
            if victim.map_or(true, |v| access_count < v.access_count) {
                victim = Some(Victim {
                    bucket,
                    prev,
                    index,
                    access_count,
                });
            }
            prev = Some(index);
        }
    }

    victim
}

// == Evict Least Recent ==
/// Unlinks the least recently used entry and returns its node to the pool.
///
/// Returns the evicted victim together with the number of value bytes it
/// released, or `None` when there was nothing to evict.
pub(crate) fn evict_least_recent(table: &mut BucketTable, pool: &mut NodePool) -> Option<(Victim, u64)> {
    let victim = find_least_recent(table, pool)?;
    table.unlink(pool, victim.bucket, victim.prev, victim.index);
    let freed = pool.release(victim.index);
    Some((victim, freed))
}
