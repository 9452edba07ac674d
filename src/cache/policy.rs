//! Expiration Policy Module
//!
//! Per-entry time-based expiration: none, sliding window or absolute deadline.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{CacheError, Result};

// == Expiration Mode ==
/// Selects which field of a [`CacheExpirationPolicy`] is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationMode {
    /// Never expires by time
    #[default]
    None,
    /// Expires after a period without access
    Sliding,
    /// Expires at a fixed wall-clock deadline
    Absolute,
}

// == TTL Spec ==
/// The store-facing form of an expiration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlSpec {
    Infinite,
    Sliding(Duration),
    Absolute(DateTime<Utc>),
}

// == Expiration Policy ==
/// Describes how an entry expires by time.
///
/// Built only through the named constructors, so a sliding policy always has
/// a positive window and an absolute policy always has a concrete deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheExpirationPolicy {
    mode: ExpirationMode,
    sliding_window: Duration,
    absolute_deadline: DateTime<Utc>,
}

impl CacheExpirationPolicy {
    /// A policy that never expires by time.
    pub fn none() -> Self {
        Self::default()
    }

    /// Expires at the given wall-clock deadline.
    pub fn with_absolute_deadline(deadline: DateTime<Utc>) -> Self {
        Self {
            mode: ExpirationMode::Absolute,
            sliding_window: Duration::ZERO,
            absolute_deadline: deadline,
        }
    }

    /// Expires `ttl` from now, regardless of access.
    pub fn with_absolute_ttl(ttl: Duration) -> Result<Self> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|_| {
            CacheError::InvalidArgument(format!("absolute ttl {:?} is out of range", ttl))
        })?;
        let deadline = Utc::now().checked_add_signed(ttl).ok_or_else(|| {
            CacheError::InvalidArgument("absolute deadline overflows the calendar".to_string())
        })?;
        Ok(Self::with_absolute_deadline(deadline))
    }

    /// Expires once the entry has gone unread for `window`.
    pub fn with_sliding_window(window: Duration) -> Result<Self> {
        if window.is_zero() {
            return Err(CacheError::InvalidArgument(
                "sliding window must be positive".to_string(),
            ));
        }
        Ok(Self {
            mode: ExpirationMode::Sliding,
            sliding_window: window,
            absolute_deadline: DateTime::<Utc>::MAX_UTC,
        })
    }

    pub fn mode(&self) -> ExpirationMode {
        self.mode
    }

    pub fn sliding_window(&self) -> Duration {
        self.sliding_window
    }

    pub fn absolute_deadline(&self) -> DateTime<Utc> {
        self.absolute_deadline
    }

    /// Resolves the policy into the TTL handed to the primitive store.
    pub fn ttl_spec(&self) -> TtlSpec {
        match self.mode {
            ExpirationMode::None => TtlSpec::Infinite,
            ExpirationMode::Sliding => TtlSpec::Sliding(self.sliding_window),
            ExpirationMode::Absolute => TtlSpec::Absolute(self.absolute_deadline),
        }
    }
}

impl Default for CacheExpirationPolicy {
    fn default() -> Self {
        Self {
            mode: ExpirationMode::None,
            sliding_window: Duration::ZERO,
            absolute_deadline: DateTime::<Utc>::MAX_UTC,
        }
    }
}
