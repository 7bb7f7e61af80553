//! Budget LRU - A fixed-capacity in-process byte cache
//!
//! Bounds memory by a byte budget over live values and evicts the least
//! recently used entries once it is exhausted.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
