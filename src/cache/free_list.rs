//! Free List Module
//!
//! Index-based node pool. Retired nodes are zeroed and threaded onto a
//! singly-linked free list through their `next` field, then handed out
//! again before the arena grows.

use crate::cache::CacheEntry;

// == Node Pool ==
/// Arena of [`CacheEntry`] nodes addressed by stable indices.
#[derive(Debug, Default)]
pub(crate) struct NodePool {
    /// Every node ever allocated, live or retired
    nodes: Vec<CacheEntry>,
    /// Head of the free list
    free_head: Option<usize>,
    /// Number of nodes currently on the free list
    free_count: usize,
}

impl NodePool {
    // == Constructor ==
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    // == Acquire ==
    /// Pops a retired node (or grows the arena) and fills it.
    ///
    /// Ownership of `key` and `value` moves into the pool.
    pub fn acquire(&mut self, key: Vec<u8>, value: Vec<u8>) -> usize {
        let entry = CacheEntry::new(key, value);
        match self.free_head {
            Some(index) => {
                self.free_head = self.nodes[index].next;
                self.free_count -= 1;
                self.nodes[index] = entry;
                index
            }
            None => {
                self.nodes.push(entry);
                self.nodes.len() - 1
            }
        }
    }

    // == Release ==
    /// Zeroes the node at `index` and pushes it onto the free list.
    ///
    /// The caller must already have unlinked it from its chain. Returns the
    /// value length the node held.
    pub fn release(&mut self, index: usize) -> u64 {
        let head = self.free_head;
        let node = &mut self.nodes[index];
        let freed = node.retire();
        node.next = head;
        self.free_head = Some(index);
        self.free_count += 1;
        freed
    }

    /// Borrows the node at `index`.
    pub fn get(&self, index: usize) -> &CacheEntry {
        &self.nodes[index]
    }

    /// Mutably borrows the node at `index`.
    pub fn get_mut(&mut self, index: usize) -> &mut CacheEntry {
        &mut self.nodes[index]
    }

    /// Number of live (non-retired) nodes.
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free_count
    }

    /// Number of nodes waiting on the free list.
    pub fn free(&self) -> usize {
        self.free_count
    }

    // == Clear ==
    /// Drops every node, live or retired, and releases the arena itself.
    pub fn clear(&mut self) {
        self.nodes = Vec::new();
        self.free_head = None;
        self.free_count = 0;
    }
}
