//! Cache Module
//!
//! Fixed-budget in-memory cache with chained hashing and approximate LRU
//! eviction over opaque byte keys and values.

mod entry;
mod free_list;
pub(crate) mod hash;
pub(crate) mod lru;
mod shared;
mod stats;
mod store;
mod table;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub(crate) use free_list::NodePool;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
pub(crate) use table::{BucketTable, Lookup};
