//! Error types for the cache
//!
//! Provides unified error handling using thiserror. "Not found" and "stale"
//! are not errors: lookups report them as `Ok(None)`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Malformed argument, e.g. a zero sliding window
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying primitive store failed
    #[error("Store error: {0}")]
    Store(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
