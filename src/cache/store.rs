//! Memory Store Module
//!
//! In-process primitive store combining HashMap storage with LRU tracking,
//! TTL expiration and eager tag-change eviction.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use crate::cache::{
    CacheEntry, CacheStats, ChangeNotifier, LruTracker, PrimitiveStore, TagSnapshot, TtlSpec,
};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Memory Store ==
/// Thread-safe in-memory store with LRU eviction and TTL support.
#[derive(Debug)]
pub struct MemoryStore<V> {
    inner: Mutex<StoreInner<V>>,
    /// Maximum number of entries allowed
    max_entries: usize,
}

#[derive(Debug)]
struct StoreInner<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
}

impl<V> StoreInner<V> {
    fn drop_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key);
        if entry.is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        entry
    }

    /// Returns the entry if it is live, dropping it if its TTL has elapsed.
    fn live_entry(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
        if self.entries.get(key)?.is_expired() {
            self.drop_entry(key);
            self.stats.record_expirations(1);
            trace!("Dropped expired entry '{}'", key);
            return None;
        }
        self.entries.get_mut(key)
    }

    /// Stores an entry, evicting the least recently used one when at capacity.
    fn insert(&mut self, key: &str, value: V, ttl: TtlSpec, max_entries: usize) -> Result<()> {
        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite && self.entries.len() >= max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                    trace!("Evicted least recently used entry '{}'", evicted);
                }
                None => {
                    return Err(CacheError::Store(
                        "Store is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        self.entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        self.lru.touch(key);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }
}

impl<V> MemoryStore<V> {
    // == Constructor ==
    /// Creates a new MemoryStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: CacheStats::new(),
            }),
            max_entries,
        }
    }

    /// Creates a MemoryStore from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.max_entries))
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner<V>>> {
        self.inner
            .lock()
            .map_err(|_| CacheError::Store("memory store lock poisoned".to_string()))
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> Result<CacheStats> {
        let inner = self.lock()?;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        Ok(stats)
    }

    // == Cleanup Expired ==
    /// Removes all time-expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> Result<usize> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;

        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.drop_entry(key);
        }
        inner.stats.record_expirations(expired_keys.len());

        Ok(expired_keys.len())
    }

    /// Returns the number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.entries.is_empty())
    }
}

impl<V: Send> ChangeNotifier for MemoryStore<V> {
    fn notify_change(&self, tag: &str, version: u64) -> Result<usize> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;

        let dependents: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.depends_on(tag, version))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &dependents {
            inner.drop_entry(key);
        }
        inner.stats.record_tag_evictions(dependents.len());

        trace!(
            "Tag '{}' advanced to {}: evicted {} dependents",
            tag,
            version,
            dependents.len()
        );
        Ok(dependents.len())
    }
}

impl<V: Clone + Send> PrimitiveStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Result<Option<V>> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;

        let value = inner.live_entry(key).map(|entry| {
            entry.touch();
            entry.value.clone()
        });

        if value.is_some() {
            inner.stats.record_hit();
            inner.lru.touch(key);
        } else {
            inner.stats.record_miss();
        }
        Ok(value)
    }

    fn add_if_absent(&self, key: &str, value: V, ttl: TtlSpec) -> Result<bool> {
        let mut inner = self.lock()?;
        if inner.live_entry(key).is_some() {
            return Ok(false);
        }
        inner.insert(key, value, ttl, self.max_entries)?;
        Ok(true)
    }

    fn set(&self, key: &str, value: V, ttl: TtlSpec) -> Result<()> {
        self.lock()?.insert(key, value, ttl, self.max_entries)
    }

    fn remove(&self, key: &str) -> Result<Option<V>> {
        let mut inner = self.lock()?;
        if inner.live_entry(key).is_none() {
            return Ok(None);
        }
        Ok(inner.drop_entry(key).map(|entry| entry.value))
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.live_entry(key).is_some())
    }

    fn remove_if(&self, key: &str, predicate: &dyn Fn(&V) -> bool) -> Result<Option<V>> {
        let mut inner = self.lock()?;
        let matched = inner
            .live_entry(key)
            .is_some_and(|entry| predicate(&entry.value));
        if !matched {
            return Ok(None);
        }
        Ok(inner.drop_entry(key).map(|entry| entry.value))
    }

    fn get_if(&self, key: &str, is_valid: &dyn Fn(&V) -> bool) -> Result<Option<V>> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;

        match inner.live_entry(key).map(|entry| is_valid(&entry.value)) {
            Some(true) => {}
            Some(false) => {
                inner.drop_entry(key);
                inner.stats.record_miss();
                trace!("Dropped rejected entry '{}'", key);
                return Ok(None);
            }
            None => {
                inner.stats.record_miss();
                return Ok(None);
            }
        }

        let value = inner.live_entry(key).map(|entry| {
            entry.touch();
            entry.value.clone()
        });
        inner.stats.record_hit();
        inner.lru.touch(key);
        Ok(value)
    }

    fn on_change(
        &self,
        key: &str,
        dependencies: &TagSnapshot,
        is_same_write: &dyn Fn(&V) -> bool,
    ) -> Result<bool> {
        let mut inner = self.lock()?;
        if let Some(entry) = inner.live_entry(key) {
            if is_same_write(&entry.value) {
                entry.dependencies = dependencies.clone();
            } else {
                trace!("Entry '{}' was overwritten; not arming its tags", key);
            }
        }
        Ok(true)
    }
}
