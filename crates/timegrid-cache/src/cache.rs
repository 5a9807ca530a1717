//! [`ExternalDataCache`] — cache-aside storage for feed payloads.
//!
//! One slot per registered feed, each with its own value lock and flight
//! guard, so unrelated feeds never contend. A miss performs exactly one
//! fetch-and-populate sequence; concurrent readers for the same feed wait
//! on the flight guard and re-check instead of fetching redundantly
//! (single-flight). Entries have no TTL: staleness is bounded only by the
//! refresh cadence, which is deliberate politeness toward the scraped
//! portal.

use std::{collections::HashMap, future::Future, pin::Pin, time::Duration};

use serde_json::Value;
use tokio::{
  sync::{Mutex, RwLock},
  time::timeout,
};
use tracing::warn;

use timegrid_core::{feed::Feed, store::FeedStore};

use crate::error::{Error, Result};

/// The error a registered fetch function may return.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// The boxed future a registered fetch function returns.
pub type FetchFuture =
  Pin<Box<dyn Future<Output = std::result::Result<Value, FetchError>> + Send>>;
type FetchFn = Box<dyn Fn() -> FetchFuture + Send + Sync>;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The result of an explicit refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
  /// The fetch ran and the cached value was replaced.
  Refreshed,
  /// A refresh for this feed was already in flight; this one was
  /// coalesced into it.
  Skipped,
}

impl RefreshOutcome {
  pub fn as_str(&self) -> &'static str {
    match self {
      RefreshOutcome::Refreshed => "refreshed",
      RefreshOutcome::Skipped => "skipped",
    }
  }
}

struct FeedSlot {
  fetch:  FetchFn,
  value:  RwLock<Option<Value>>,
  flight: Mutex<()>,
}

/// Cache-aside store for external feed payloads, backed by a [`FeedStore`]
/// so contents survive process restarts.
pub struct ExternalDataCache<S: FeedStore> {
  store:         S,
  fetch_timeout: Duration,
  slots:         HashMap<Feed, FeedSlot>,
}

impl<S: FeedStore> ExternalDataCache<S> {
  pub fn builder(store: S) -> Builder<S> {
    Builder {
      store,
      fetch_timeout: DEFAULT_FETCH_TIMEOUT,
      slots: HashMap::new(),
    }
  }

  /// Current payload for `feed`, populating the entry on a miss.
  ///
  /// Miss path, under the feed's flight guard: re-check the value (a
  /// concurrent winner may have populated it), warm-start from backing
  /// persistence, then run one bounded fetch. A fetch failure with no
  /// prior value is [`Error::NotReady`] — no successful fetch has ever
  /// completed for this feed.
  pub async fn get(&self, feed: Feed) -> Result<Value> {
    let slot = self.slot(feed)?;

    if let Some(value) = slot.value.read().await.as_ref() {
      return Ok(value.clone());
    }

    let _flight = slot.flight.lock().await;

    if let Some(value) = slot.value.read().await.as_ref() {
      return Ok(value.clone());
    }

    match self.store.load(feed).await {
      Ok(Some(stored)) => {
        *slot.value.write().await = Some(stored.payload.clone());
        return Ok(stored.payload);
      }
      Ok(None) => {}
      Err(e) => {
        // Degraded persistence never blocks reads.
        warn!(%feed, error = %e, "failed to load persisted feed payload");
      }
    }

    self
      .run_fetch(feed, slot)
      .await
      .map_err(|source| Error::NotReady { feed, source })
  }

  /// Unconditionally re-fetch `feed` and replace its entry as a unit.
  ///
  /// If a refresh for the same feed is already in flight the trigger is
  /// coalesced and [`RefreshOutcome::Skipped`] is returned — overlapping
  /// refreshes are never queued. On failure the previous value, if any,
  /// is left intact: stale-but-valid beats an outage.
  pub async fn refresh(&self, feed: Feed) -> Result<RefreshOutcome> {
    let slot = self.slot(feed)?;

    let Ok(_flight) = slot.flight.try_lock() else {
      return Ok(RefreshOutcome::Skipped);
    };

    self
      .run_fetch(feed, slot)
      .await
      .map(|_| RefreshOutcome::Refreshed)
      .map_err(|source| Error::Refresh { feed, source })
  }

  fn slot(&self, feed: Feed) -> Result<&FeedSlot> {
    self.slots.get(&feed).ok_or(Error::Unregistered(feed))
  }

  /// One bounded fetch-persist-publish sequence. The in-memory value is
  /// replaced only after the fetch fully succeeds, so a timeout or fetch
  /// error can never leave a partially-updated entry.
  async fn run_fetch(
    &self,
    feed: Feed,
    slot: &FeedSlot,
  ) -> std::result::Result<Value, FetchError> {
    let value = match timeout(self.fetch_timeout, (slot.fetch)()).await {
      Ok(fetched) => fetched?,
      Err(elapsed) => return Err(Box::new(elapsed)),
    };

    if let Err(e) = self.store.save(feed, &value).await {
      warn!(%feed, error = %e, "failed to persist feed payload");
    }

    *slot.value.write().await = Some(value.clone());
    Ok(value)
  }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Builds an [`ExternalDataCache`] with one fetch function per feed.
pub struct Builder<S: FeedStore> {
  store:         S,
  fetch_timeout: Duration,
  slots:         HashMap<Feed, FeedSlot>,
}

impl<S: FeedStore> Builder<S> {
  /// Bound on one fetch sequence (navigation, settle polling, and
  /// extraction included for the timetable feed).
  pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
    self.fetch_timeout = timeout;
    self
  }

  /// Register the fetch function for `feed`, replacing any previous one.
  pub fn register<F, Fut>(mut self, feed: Feed, fetch: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<Value, FetchError>>
      + Send
      + 'static,
  {
    self.slots.insert(feed, FeedSlot {
      fetch:  Box::new(move || Box::pin(fetch())),
      value:  RwLock::new(None),
      flight: Mutex::new(()),
    });
    self
  }

  pub fn build(self) -> ExternalDataCache<S> {
    ExternalDataCache {
      store:         self.store,
      fetch_timeout: self.fetch_timeout,
      slots:         self.slots,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
