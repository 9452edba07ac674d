//! Cache Entry Module
//!
//! Defines the structure for individual memory store entries with TTL support.

use chrono::{DateTime, Utc};

use crate::cache::{TagSnapshot, TtlSpec};

// == Cache Entry ==
/// Represents a single memory store entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Time-based expiration rule
    pub ttl: TtlSpec,
    /// Last read timestamp, the origin of a sliding window
    pub last_accessed: DateTime<Utc>,
    /// Tag versions this entry is armed against for change notification
    pub dependencies: TagSnapshot,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry with the given TTL and no armed dependencies.
    pub fn new(value: V, ttl: TtlSpec) -> Self {
        Self {
            value,
            ttl,
            last_accessed: Utc::now(),
            dependencies: TagSnapshot::new(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An absolute entry is live up to and including its deadline; a sliding
    /// entry is live while the idle time does not exceed its window.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires) => now > expires,
            None => false,
        }
    }

    // == Touch ==
    /// Records a read, restarting a sliding window.
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }

    // == Expires At ==
    /// Returns the instant after which the entry is expired, or None if it
    /// never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self.ttl {
            TtlSpec::Infinite => None,
            TtlSpec::Absolute(deadline) => Some(deadline),
            // A window too large for the calendar never elapses
            TtlSpec::Sliding(window) => chrono::Duration::from_std(window)
                .ok()
                .and_then(|window| self.last_accessed.checked_add_signed(window)),
        }
    }

    /// Whether a change of `tag` to `version` invalidates this entry.
    pub fn depends_on(&self, tag: &str, version: u64) -> bool {
        self.dependencies
            .get(tag)
            .is_some_and(|captured| *captured < version)
    }
}
