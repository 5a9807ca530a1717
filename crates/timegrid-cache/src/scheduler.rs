//! [`RefreshScheduler`] — independent periodic refresh triggers.
//!
//! One spawned task per configured feed. Cadence is policy, not
//! correctness: each feed ticks on its own interval, a failing feed only
//! logs, and a tick that fires while the previous refresh is still in
//! flight is coalesced by the cache's flight guard rather than queued.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use timegrid_core::{feed::Feed, store::FeedStore};

use crate::cache::{ExternalDataCache, RefreshOutcome};

/// Periodic refresh driver over an [`ExternalDataCache`].
pub struct RefreshScheduler<S: FeedStore> {
  cache:    Arc<ExternalDataCache<S>>,
  cadences: Vec<(Feed, Duration)>,
}

impl<S: FeedStore + 'static> RefreshScheduler<S> {
  pub fn new(cache: Arc<ExternalDataCache<S>>) -> Self {
    Self {
      cache,
      cadences: Vec::new(),
    }
  }

  /// Schedule `feed` for refresh every `cadence`.
  pub fn every(mut self, feed: Feed, cadence: Duration) -> Self {
    self.cadences.push((feed, cadence));
    self
  }

  /// Spawn one refresh loop per configured feed. The first refresh fires
  /// immediately to warm the cache; later missed ticks are skipped, not
  /// replayed.
  pub fn spawn(self) -> Vec<JoinHandle<()>> {
    self
      .cadences
      .into_iter()
      .map(|(feed, cadence)| {
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
          info!(%feed, ?cadence, "refresh schedule started");
          let mut ticker = tokio::time::interval(cadence);
          ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
          loop {
            ticker.tick().await;
            match cache.refresh(feed).await {
              Ok(RefreshOutcome::Refreshed) => {
                debug!(%feed, "scheduled refresh completed");
              }
              Ok(RefreshOutcome::Skipped) => {
                debug!(%feed, "previous refresh still in flight, skipped");
              }
              Err(e) => {
                // Retried on the next cadence tick; the cache keeps
                // serving the previous value meanwhile.
                warn!(%feed, error = %e, "scheduled refresh failed");
              }
            }
          }
        })
      })
      .collect()
  }
}
