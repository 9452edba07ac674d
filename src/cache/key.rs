//! Cache Key Module
//!
//! Defines the logical identity of an entry and the tags it depends on.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// == Cache Tag ==
/// Names a tag-controlled invalidation scope.
///
/// Equality is exact and case-sensitive. Tags need no registration: the first
/// reference creates the tag's version lazily.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheTag(String);

impl CacheTag {
    /// Creates a tag from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the tag identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheTag {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CacheTag {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for CacheTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CacheTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Cache Key ==
/// An entry's logical identity plus the tags it depends on.
///
/// Identity is the `key` string alone; `tags` only declares invalidation
/// dependencies, so two keys with the same string but different tags compare
/// equal and address the same stored entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheKey {
    key: String,
    #[serde(default)]
    tags: BTreeSet<CacheTag>,
}

impl CacheKey {
    // == Constructor ==
    /// Creates an untagged key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            tags: BTreeSet::new(),
        }
    }

    /// Returns this key with one more tag dependency.
    pub fn with_tag(mut self, tag: impl Into<CacheTag>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Returns this key with every tag in `tags` added as a dependency.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CacheTag>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// The string used verbatim as the primitive store key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn tags(&self) -> &BTreeSet<CacheTag> {
        &self.tags
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
