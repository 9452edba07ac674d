//! Primitive Store Module
//!
//! The capability surface the cache needs from an underlying key-value engine.
//! Implementations hold the values, enforce TTLs and may evict under memory
//! pressure; the provider layers tag invalidation on top.

use crate::cache::{TagSnapshot, TtlSpec};
use crate::error::Result;

// == Change Notifier ==
/// Receives tag changes.
///
/// A store that evicts dependents here frees them as soon as a tag changes.
/// Stores that keep the default are still correct: the provider validates
/// tag versions on every read and drops stale entries lazily.
pub trait ChangeNotifier: Send + Sync {
    /// Signals that `tag` advanced to `version`.
    ///
    /// Returns the number of entries evicted as a consequence.
    fn notify_change(&self, tag: &str, version: u64) -> Result<usize> {
        let _ = (tag, version);
        Ok(0)
    }
}

// == Primitive Store ==
/// Key-value operations, each atomic for a single key.
///
/// Time-expired entries must behave as absent for every operation.
pub trait PrimitiveStore<V>: ChangeNotifier {
    /// Returns the live value, restarting its sliding window if it has one.
    fn get(&self, key: &str) -> Result<Option<V>>;

    /// Inserts only if no live entry exists. Returns whether it inserted.
    fn add_if_absent(&self, key: &str, value: V, ttl: TtlSpec) -> Result<bool>;

    /// Inserts or overwrites unconditionally.
    fn set(&self, key: &str, value: V, ttl: TtlSpec) -> Result<()>;

    /// Evicts the entry, returning its value if it was live.
    fn remove(&self, key: &str) -> Result<Option<V>>;

    fn contains(&self, key: &str) -> Result<bool>;

    /// Evicts the entry only if it is live and `predicate` accepts its value.
    ///
    /// The default composes `get` and `remove` and is therefore not atomic;
    /// stores that can check and remove under one lock should override it.
    fn remove_if(&self, key: &str, predicate: &dyn Fn(&V) -> bool) -> Result<Option<V>> {
        match self.get(key)? {
            Some(value) if predicate(&value) => self.remove(key),
            _ => Ok(None),
        }
    }

    /// Returns the live value only if `is_valid` accepts it. A rejected value
    /// is evicted and the read counts as a miss.
    ///
    /// The default composes `get` and `remove_if`; stores that keep read
    /// statistics should override it so a rejected value is not a hit.
    fn get_if(&self, key: &str, is_valid: &dyn Fn(&V) -> bool) -> Result<Option<V>> {
        match self.get(key)? {
            Some(value) if is_valid(&value) => Ok(Some(value)),
            Some(_) => {
                self.remove_if(key, &|value: &V| !is_valid(value))?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Arms the entry at `key` to be evicted when any tag in `dependencies`
    /// advances past its captured version, provided `is_same_write` accepts
    /// the value currently stored there.
    ///
    /// The check and the registration must happen atomically, so tags are
    /// never attached to a value written by a concurrent caller. Returns
    /// `false` when the store has no change notification support.
    fn on_change(
        &self,
        key: &str,
        dependencies: &TagSnapshot,
        is_same_write: &dyn Fn(&V) -> bool,
    ) -> Result<bool> {
        let _ = (key, dependencies, is_same_write);
        Ok(false)
    }
}
