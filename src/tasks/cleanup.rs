//! TTL Cleanup Task
//!
//! Background task that periodically removes time-expired memory store entries.
//! Reads already ignore expired entries; the sweep reclaims the ones nobody
//! reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::MemoryStore;
use crate::config::Config;

/// Spawns a background task that periodically cleans up expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between cleanup runs. A failed sweep is logged and retried on the next tick.
///
/// # Arguments
/// * `store` - shared reference to the memory store
/// * `config` - supplies `cleanup_interval`, in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which the owner aborts on shutdown.
///
/// # Example
/// ```ignore
/// let config = Config::from_env();
/// let store = Arc::new(MemoryStore::from_config(&config)?);
/// let cleanup_handle = spawn_cleanup_task(store.clone(), &config);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(store: Arc<MemoryStore<V>>, config: &Config) -> JoinHandle<()>
where
    V: Send + 'static,
{
    let cleanup_interval_secs = config.cleanup_interval;
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match store.cleanup_expired() {
                Ok(0) => debug!("TTL cleanup: no expired entries found"),
                Ok(removed) => info!("TTL cleanup: removed {} expired entries", removed),
                Err(err) => warn!("TTL cleanup failed: {}", err),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{PrimitiveStore, TtlSpec};
    use chrono::Utc;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = Arc::new(MemoryStore::new(100));
        let deadline = Utc::now() + chrono::Duration::milliseconds(200);
        store
            .set("expire_soon", "value".to_string(), TtlSpec::Absolute(deadline))
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), &Config::default());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Checked through len so the lazy expiry on read cannot mask the sweep
        assert_eq!(store.len().unwrap(), 0, "Expired entry should have been swept");
        assert_eq!(store.stats().unwrap().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = Arc::new(MemoryStore::new(100));
        store
            .set(
                "long_lived",
                "value".to_string(),
                TtlSpec::Sliding(Duration::from_secs(3600)),
            )
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), &Config::default());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(store.get("long_lived").unwrap(), Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(MemoryStore::<String>::new(100));

        let handle = spawn_cleanup_task(store, &Config::default());
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
