//! Cache Provider Module
//!
//! The public facade. Composes keys, expiration policies and tag versions on
//! top of an injected primitive store.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{
    CacheExpirationPolicy, CacheKey, MemoryStore, PrimitiveStore, TagSnapshot, TagVersionStore,
    TaggedValue,
};
use crate::config::Config;
use crate::error::Result;

// == Cache Provider ==
/// Object cache with tag-based group invalidation.
///
/// Construct one per process (or per cache domain) and share it by reference
/// or `Arc`. Every read validates the tag versions captured at write time, so
/// an expired tag is never served even by a store without change
/// notification; stores that do support it also evict dependents eagerly.
pub struct CacheProvider<V, S = MemoryStore<TaggedValue<V>>> {
    store: Arc<S>,
    tags: TagVersionStore<S>,
    _value: PhantomData<fn() -> V>,
}

impl<V, S> CacheProvider<V, S>
where
    S: PrimitiveStore<TaggedValue<V>>,
{
    /// Creates a provider over an existing store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            tags: TagVersionStore::new(Arc::clone(&store)),
            store,
            _value: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // == Add ==
    /// Inserts only if no live, tag-fresh entry exists for the key.
    ///
    /// Returns `true` iff this call inserted. Among concurrent callers for
    /// the same key at most one observes `true`.
    pub fn add(&self, key: &CacheKey, value: V, policy: &CacheExpirationPolicy) -> Result<bool> {
        let (entry, dependencies) = self.tagged(key, value);

        if self.evict_stale(key.key())? {
            debug!("Replacing tag-stale entry '{}'", key);
        }
        let inserted = self
            .store
            .add_if_absent(key.key(), entry, policy.ttl_spec())?;
        if inserted {
            self.arm(key, &dependencies)?;
        }

        debug!("Add '{}': inserted={}", key, inserted);
        Ok(inserted)
    }

    // == Set ==
    /// Inserts or overwrites unconditionally. Always returns `true`.
    pub fn set(&self, key: &CacheKey, value: V, policy: &CacheExpirationPolicy) -> Result<bool> {
        let (entry, dependencies) = self.tagged(key, value);

        self.store.set(key.key(), entry, policy.ttl_spec())?;
        self.arm(key, &dependencies)?;

        debug!("Set '{}'", key);
        Ok(true)
    }

    // == Get ==
    /// Returns the cached value, or None when missing, time-expired or
    /// invalidated by a tag.
    pub fn get(&self, key: &CacheKey) -> Result<Option<V>> {
        let is_fresh = |entry: &TaggedValue<V>| self.tags.is_current(&entry.tag_versions);
        let value = self
            .store
            .get_if(key.key(), &is_fresh)?
            .map(|entry| entry.value);

        debug!("Get '{}': hit={}", key, value.is_some());
        Ok(value)
    }

    // == Get Or Add ==
    /// Returns the cached value, computing and adding it on a miss.
    ///
    /// `factory` runs at most once per call and concurrent callers are not
    /// coalesced. When another caller adds the key between our miss and our
    /// add, this returns `None` rather than the winner's value; callers must
    /// treat that like "not cached", not as a failure.
    pub fn get_or_add<F>(
        &self,
        key: &CacheKey,
        factory: F,
        policy: &CacheExpirationPolicy,
    ) -> Result<Option<V>>
    where
        V: Clone,
        F: FnOnce(&CacheKey) -> V,
    {
        if let Some(value) = self.get(key)? {
            return Ok(Some(value));
        }

        let value = factory(key);
        if self.add(key, value.clone(), policy)? {
            Ok(Some(value))
        } else {
            debug!("GetOrAdd '{}': lost the add race", key);
            Ok(None)
        }
    }

    // == Remove ==
    /// Evicts the entry, returning its value if it was live and tag-fresh.
    pub fn remove(&self, key: &CacheKey) -> Result<Option<V>> {
        let removed = self
            .store
            .remove(key.key())?
            .filter(|entry| self.tags.is_current(&entry.tag_versions))
            .map(|entry| entry.value);

        debug!("Remove '{}': present={}", key, removed.is_some());
        Ok(removed)
    }

    /// Whether a live, tag-fresh entry exists. Counts as a read, so it
    /// restarts a sliding window.
    pub fn contains(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    // == Expire ==
    /// Invalidates every entry depending on `tag`.
    ///
    /// Unknown tags are created. Returns the number of entries evicted
    /// eagerly; entries in stores without change notification are dropped
    /// on their next read instead and are not counted.
    pub fn expire<T: AsRef<str>>(&self, tag: T) -> Result<usize> {
        let tag = tag.as_ref();
        let evicted = self.tags.bump(tag)?;

        debug!("Expire '{}': evicted {} entries", tag, evicted);
        Ok(evicted)
    }

    fn tagged(&self, key: &CacheKey, value: V) -> (TaggedValue<V>, TagSnapshot) {
        let tag_versions = self.tags.snapshot(key.tags());
        let entry = TaggedValue {
            value,
            tag_versions: tag_versions.clone(),
        };
        (entry, tag_versions)
    }

    /// Registers push invalidation for a freshly written entry, unless a
    /// concurrent write has already replaced it.
    fn arm(&self, key: &CacheKey, dependencies: &TagSnapshot) -> Result<()> {
        if dependencies.is_empty() {
            return Ok(());
        }
        let is_same_write = |stored: &TaggedValue<V>| stored.tag_versions == *dependencies;
        if !self.store.on_change(key.key(), dependencies, &is_same_write)? {
            debug!("Store has no change notification; '{}' is validated on read", key);
        }
        Ok(())
    }

    /// Removes the entry only if it is still tag-stale.
    fn evict_stale(&self, key: &str) -> Result<bool> {
        let is_stale = |entry: &TaggedValue<V>| !self.tags.is_current(&entry.tag_versions);
        Ok(self.store.remove_if(key, &is_stale)?.is_some())
    }
}

impl<V: Clone + Send> CacheProvider<V> {
    /// Creates a provider over a fresh [`MemoryStore`].
    pub fn in_memory(config: &Config) -> Result<Self> {
        Ok(Self::new(Arc::new(MemoryStore::from_config(config)?)))
    }
}
