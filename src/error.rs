//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
///
/// A successful operation is plain `Ok(..)`; there is no explicit
/// "no error" variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The value can never fit, even after evicting every live entry
    #[error("Value too large: {size} bytes exceeds the cache budget of {budget} bytes")]
    ValueTooLarge {
        /// Length of the rejected value
        size: u64,
        /// Total byte budget of the cache
        budget: u64,
    },

    /// Creation parameters cannot produce a usable bucket array
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The bucket array could not be allocated
    #[error("Allocation failed: {0}")]
    Allocation(String),

    /// The engine lock was poisoned or could not be torn down
    #[error("Synchronization error: {0}")]
    Synchronization(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
