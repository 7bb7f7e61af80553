//! Cache Entry Module
//!
//! Defines the item node stored in bucket chains and recycled by the free list.

// == Cache Entry ==
/// A single cached item plus its chain link.
///
/// The node owns its key and value buffers. `next` is the index of the
/// following node in whichever list currently owns this one: a bucket
/// chain while live, the free list once retired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CacheEntry {
    /// Opaque key bytes
    pub key: Vec<u8>,
    /// Opaque value bytes
    pub value: Vec<u8>,
    /// Global access stamp of the last get/set touching this entry
    pub access_count: u64,
    /// Next node in the owning list
    pub next: Option<usize>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a live entry taking ownership of `key` and `value`.
    pub fn new(key: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            key,
            value,
            access_count: 0,
            next: None,
        }
    }

    // == Key Match ==
    /// Exact `(length, bytes)` comparison against `key`.
    pub fn matches(&self, key: &[u8]) -> bool {
        self.key.len() == key.len() && self.key == key
    }

    /// Length of the stored value in bytes, the unit charged to the budget.
    pub fn value_length(&self) -> u64 {
        self.value.len() as u64
    }

    // == Replace Value ==
    /// Installs a new value, returning the previous one.
    ///
    /// The key buffer is left untouched.
    pub fn replace_value(&mut self, value: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.value, value)
    }

    // == Retire ==
    /// Zeroes the node, releasing both buffers.
    ///
    /// Returns the value length that was held so the caller can credit it
    /// back to the budget.
    pub fn retire(&mut self) -> u64 {
        let freed = self.value_length();
        *self = Self::default();
        freed
    }
}
