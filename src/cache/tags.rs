//! Tag Version Module
//!
//! Tracks a version per tag instead of a reverse index of member keys. An
//! entry captures the versions of its tags when written and is stale as soon
//! as any of them moves on.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use crate::cache::{CacheTag, ChangeNotifier};
use crate::error::Result;

/// Tag versions captured when an entry was written.
pub type TagSnapshot = HashMap<String, u64>;

// == Tagged Value ==
/// What the provider writes into the primitive store: the caller's value
/// plus the tag versions it was computed against.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedValue<V> {
    pub value: V,
    pub tag_versions: TagSnapshot,
}

// == Tag Version Store ==
/// Maps each tag to a strictly increasing version.
///
/// Versions are microseconds since the epoch, advanced by at least one on
/// every bump so two bumps within the same clock tick stay distinguishable.
/// Each tag's version is read and written under its map shard lock, so a
/// reader never observes a version older than a completed bump.
pub struct TagVersionStore<N: ?Sized> {
    versions: DashMap<String, u64>,
    notifier: Arc<N>,
}

impl<N: ChangeNotifier + ?Sized> TagVersionStore<N> {
    /// Creates an empty version store that reports bumps to `notifier`.
    pub fn new(notifier: Arc<N>) -> Self {
        Self {
            versions: DashMap::new(),
            notifier,
        }
    }

    // == Current Version ==
    /// Returns the tag's version, creating it at the current time if unseen.
    pub fn current_version(&self, tag: &str) -> u64 {
        if let Some(version) = self.versions.get(tag) {
            return *version;
        }
        *self
            .versions
            .entry(tag.to_string())
            .or_insert_with(now_micros)
    }

    /// Captures the current version of every tag.
    pub fn snapshot<'a, I>(&self, tags: I) -> TagSnapshot
    where
        I: IntoIterator<Item = &'a CacheTag>,
    {
        tags.into_iter()
            .map(|tag| (tag.as_str().to_string(), self.current_version(tag.as_str())))
            .collect()
    }

    /// Whether no tag in the snapshot has moved since it was captured.
    pub fn is_current(&self, snapshot: &TagSnapshot) -> bool {
        snapshot
            .iter()
            .all(|(tag, captured)| self.current_version(tag) == *captured)
    }

    // == Bump ==
    /// Advances the tag's version past every version it has had.
    ///
    /// Returns the number of entries the store evicted eagerly, which is 0
    /// when the store has no change notification support.
    pub fn bump(&self, tag: &str) -> Result<usize> {
        let version = {
            let mut current = self.versions.entry(tag.to_string()).or_insert(0);
            let next = now_micros().max(*current + 1);
            *current = next;
            next
        };
        debug!("Tag '{}' bumped to version {}", tag, version);

        self.notifier.notify_change(tag, version)
    }
}

fn now_micros() -> u64 {
    Utc::now().timestamp_micros().max(0) as u64
}
