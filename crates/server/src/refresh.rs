// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Periodic bid-count cache refresh.
//!
//! Liveness in this system is polling, not push: browse clients refresh
//! on an interval, and the server keeps one aggregate warm instead of
//! letting every poll recompute it. The refresher sleeps a jittered
//! interval between passes so a fleet of server instances never lines
//! up its queries against the store, and shuts down through a watch
//! channel rather than being aborted mid-query.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use kazi_persistence::{SqlitePersistence, TieredBidStore};

/// The base refresh interval between aggregation passes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// The maximum random jitter added to each sleep, in milliseconds.
const MAX_JITTER_MS: u64 = 5_000;

/// A cache entry is served until it reaches twice the refresh interval;
/// past that the handler recomputes inline rather than serving stale
/// counts from a wedged refresher.
pub const MAX_CACHE_AGE: Duration = Duration::from_secs(30);

/// The cached bid-count aggregate.
#[derive(Debug, Default)]
pub struct BidCountCache {
    counts: HashMap<String, u64>,
    refreshed_at: Option<Instant>,
}

impl BidCountCache {
    /// Creates an empty, stale cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached counts if they are fresh enough to serve.
    #[must_use]
    pub fn fresh_counts(&self, max_age: Duration) -> Option<HashMap<String, u64>> {
        let refreshed_at: Instant = self.refreshed_at?;
        if refreshed_at.elapsed() <= max_age {
            Some(self.counts.clone())
        } else {
            None
        }
    }

    /// Replaces the cached counts.
    pub fn update(&mut self, counts: HashMap<String, u64>) {
        self.counts = counts;
        self.refreshed_at = Some(Instant::now());
    }
}

/// Spawns the background refresher.
///
/// The task wakes every `REFRESH_INTERVAL` plus up to `MAX_JITTER` of
/// random delay, recomputes the aggregate, and stores it in the cache.
/// Sending `true` on the shutdown channel stops it after the current
/// sleep.
pub fn spawn_refresher(
    store: Arc<Mutex<TieredBidStore<SqlitePersistence>>>,
    cache: Arc<RwLock<BidCountCache>>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Bid-count refresher started (interval {:?}, jitter up to {}ms)",
            REFRESH_INTERVAL, MAX_JITTER_MS
        );

        loop {
            let jitter: Duration = Duration::from_millis(rand::random_range(0..=MAX_JITTER_MS));

            tokio::select! {
                () = tokio::time::sleep(REFRESH_INTERVAL + jitter) => {}
                changed = shutdown.changed() => {
                    // A dropped sender means the server is gone too.
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Bid-count refresher shutting down");
                        return;
                    }
                }
            }

            let counts: HashMap<String, u64> = {
                let mut guard = store.lock().await;
                match guard.bid_counts() {
                    Ok(counts) => counts,
                    Err(e) => {
                        warn!("Bid-count refresh pass failed: {}", e);
                        continue;
                    }
                }
            };

            debug!("Refreshed bid counts for {} tasks", counts.len());
            cache.write().await.update(counts);
        }
    })
}
