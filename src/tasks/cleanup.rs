//! TTL Cleanup Task
//!
//! Background task that periodically drops expired listings from the cache.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that purges expired cache entries every
/// `cleanup_interval_secs` seconds.
///
/// Reads already treat expired entries as misses; this only reclaims their
/// memory. The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: SharedCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.purge_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired listings", removed);
            } else {
                debug!("TTL cleanup: no expired listings found");
            }
        }
    })
}
