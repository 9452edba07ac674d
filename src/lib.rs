//! Tag Cache - An in-process object cache with tag-based invalidation
//!
//! Stores computed values under string keys with sliding or absolute
//! expiration. Entries may depend on tags; expiring a tag invalidates every
//! entry that depends on it.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    CacheExpirationPolicy, CacheKey, CacheProvider, CacheTag, MemoryStore, PrimitiveStore,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
