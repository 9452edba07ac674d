//! Cache Module
//!
//! Keys, expiration policies, tag versions and the provider facade, plus the
//! bundled in-memory primitive store.

mod entry;
mod key;
mod lru;
mod policy;
mod primitive;
mod provider;
mod stats;
mod store;
mod tags;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{CacheKey, CacheTag};
pub use lru::LruTracker;
pub use policy::{CacheExpirationPolicy, ExpirationMode, TtlSpec};
pub use primitive::{ChangeNotifier, PrimitiveStore};
pub use provider::CacheProvider;
pub use stats::CacheStats;
pub use store::MemoryStore;
pub use tags::{TagSnapshot, TagVersionStore, TaggedValue};
