//! Bucket Table Module
//!
//! Fixed array of singly-linked chains of pool nodes. The table only holds
//! chain heads; links live in each node's `next` field.

use crate::cache::hash::bucket_index;
use crate::cache::NodePool;
use crate::error::{CacheError, Result};

// == Lookup Result ==
/// Outcome of scanning a chain for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// Key present at `index`, preceded in the chain by `prev`
    Found {
        /// Predecessor in the chain, `None` when the node is the head
        prev: Option<usize>,
        /// Node holding the key
        index: usize,
    },
    /// Key absent; `tail` is the last node of the chain, if any
    Missing {
        /// Last node of the scanned chain
        tail: Option<usize>,
    },
}

// == Bucket Table ==
/// Seeded hash table of chains. The bucket count never changes.
#[derive(Debug)]
pub(crate) struct BucketTable {
    /// Chain heads, one per bucket
    heads: Vec<Option<usize>>,
    /// Per-table hash seed
    seed: u32,
}

impl BucketTable {
    // == Constructor ==
    /// Creates `bucket_count` empty chains hashed with `seed`.
    ///
    /// Fails on a zero bucket count or when the head array cannot be
    /// reserved.
    pub fn new(bucket_count: usize, seed: u32) -> Result<Self> {
        if bucket_count == 0 {
            return Err(CacheError::InvalidConfig(
                "bucket array must have at least one bucket".to_string(),
            ));
        }

        let mut heads = Vec::new();
        heads.try_reserve_exact(bucket_count).map_err(|e| {
            CacheError::Allocation(format!("unable to reserve {} buckets: {}", bucket_count, e))
        })?;
        heads.resize(bucket_count, None);

        Ok(Self { heads, seed })
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    /// Seed used to hash keys into buckets.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    // == Bucket Of ==
    /// Bucket that `key` hashes to.
    pub fn bucket_of(&self, key: &[u8]) -> usize {
        bucket_index(self.seed, key, self.heads.len())
    }

    // == Find ==
    /// Walks the chain of `bucket` comparing keys for exact equality.
    pub fn find(&self, pool: &NodePool, bucket: usize, key: &[u8]) -> Lookup {
        let mut prev = None;
        for index in self.chain(pool, bucket) {
            if pool.get(index).matches(key) {
                return Lookup::Found { prev, index };
            }
            prev = Some(index);
        }
        Lookup::Missing { tail: prev }
    }

    // == Append ==
    /// Links `index` after `tail`, or as the head when the chain is empty.
    pub fn append(&mut self, pool: &mut NodePool, bucket: usize, tail: Option<usize>, index: usize) {
        pool.get_mut(index).next = None;
        match tail {
            Some(tail) => pool.get_mut(tail).next = Some(index),
            None => self.heads[bucket] = Some(index),
        }
    }

    // == Unlink ==
    /// Removes `index` from the chain of `bucket` given its predecessor.
    pub fn unlink(&mut self, pool: &mut NodePool, bucket: usize, prev: Option<usize>, index: usize) {
        let next = pool.get_mut(index).next.take();
        match prev {
            Some(prev) => pool.get_mut(prev).next = next,
            None => self.heads[bucket] = next,
        }
    }

    // == Chain ==
    /// Iterates the node indices of `bucket` in chain order.
    pub fn chain<'a>(&self, pool: &'a NodePool, bucket: usize) -> Chain<'a> {
        Chain {
            pool,
            cursor: self.heads[bucket],
        }
    }

    // == Clear ==
    /// Empties every chain and releases the head array.
    ///
    /// The nodes themselves belong to the pool and are released there.
    pub fn clear(&mut self) {
        self.heads = Vec::new();
    }
}

// == Chain Iterator ==
/// Iterator over one bucket's node indices.
pub(crate) struct Chain<'a> {
    pool: &'a NodePool,
    cursor: Option<usize>,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.cursor?;
        self.cursor = self.pool.get(index).next;
        Some(index)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn insert(table: &mut BucketTable, pool: &mut NodePool, bucket: usize, key: &[u8]) -> usize {
        let tail = match table.find(pool, bucket, key) {
            Lookup::Missing { tail } => tail,
            Lookup::Found { .. } => panic!("key already present"),
        };
        let index = pool.acquire(key.to_vec(), Vec::new());
        table.append(pool, bucket, tail, index);
        index
    }

    #[test]
    fn test_find_missing_on_empty_chain() {
        let table = BucketTable::new(4, 0).unwrap();
        let pool = NodePool::new();

        assert_eq!(table.find(&pool, 0, b"a"), Lookup::Missing { tail: None });
    }

    #[test]
    fn test_append_preserves_order() {
        let mut table = BucketTable::new(1, 0).unwrap();
        let mut pool = NodePool::new();

        let a = insert(&mut table, &mut pool, 0, b"a");
        let b = insert(&mut table, &mut pool, 0, b"b");
        let c = insert(&mut table, &mut pool, 0, b"c");

        let chain: Vec<usize> = table.chain(&pool, 0).collect();
        assert_eq!(chain, vec![a, b, c]);
        assert_eq!(
            table.find(&pool, 0, b"c"),
            Lookup::Found {
                prev: Some(b),
                index: c
            }
        );
        assert_eq!(table.find(&pool, 0, b"d"), Lookup::Missing { tail: Some(c) });
    }

    #[test]
    fn test_unlink_head_middle_tail() {
        let mut table = BucketTable::new(1, 0).unwrap();
        let mut pool = NodePool::new();

        let a = insert(&mut table, &mut pool, 0, b"a");
        let b = insert(&mut table, &mut pool, 0, b"b");
        let c = insert(&mut table, &mut pool, 0, b"c");
        let d = insert(&mut table, &mut pool, 0, b"d");

        table.unlink(&mut pool, 0, Some(a), b);
        assert_eq!(table.chain(&pool, 0).collect::<Vec<_>>(), vec![a, c, d]);

        table.unlink(&mut pool, 0, None, a);
        assert_eq!(table.chain(&pool, 0).collect::<Vec<_>>(), vec![c, d]);

        table.unlink(&mut pool, 0, Some(c), d);
        assert_eq!(table.chain(&pool, 0).collect::<Vec<_>>(), vec![c]);
        assert_eq!(table.chain(&pool, 0).count(), 1);
    }

    #[test]
    fn test_bucket_of_is_stable_for_seed() {
        let table = BucketTable::new(4, 7).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.seed(), 7);
        assert_eq!(table.bucket_of(b"key0"), table.bucket_of(b"key0"));
        assert!(table.bucket_of(b"anything") < 4);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        assert!(matches!(
            BucketTable::new(0, 0),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_huge_table_reports_allocation_failure() {
        assert!(matches!(
            BucketTable::new(usize::MAX / 2, 0),
            Err(CacheError::Allocation(_))
        ));
    }

    #[test]
    fn test_buckets_are_independent() {
        let mut table = BucketTable::new(2, 0).unwrap();
        let mut pool = NodePool::new();

        let a = insert(&mut table, &mut pool, 0, b"a");
        let b = insert(&mut table, &mut pool, 1, b"a");

        assert_eq!(table.find(&pool, 0, b"a"), Lookup::Found { prev: None, index: a });
        assert_eq!(table.find(&pool, 1, b"a"), Lookup::Found { prev: None, index: b });
    }
}
