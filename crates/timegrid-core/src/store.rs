//! The `FeedStore` trait — backing persistence for cached feed payloads.
//!
//! Implemented by storage backends (e.g. `timegrid-store-sqlite`). The
//! cache layer depends on this abstraction, not on any concrete backend.
//! Entries have no expiry; staleness is governed entirely by refresh
//! cadence, so the store records `fetched_at` as diagnostic metadata only.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::feed::Feed;

/// A persisted cache entry for one feed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFeed {
  pub payload:    serde_json::Value,
  pub fetched_at: DateTime<Utc>,
}

/// Abstraction over the cache's backing key-value persistence.
///
/// One entry per feed; `save` overwrites wholesale. Implementations must
/// tolerate concurrent calls for unrelated feeds.
pub trait FeedStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the persisted entry for `feed`, if any.
  fn load(
    &self,
    feed: Feed,
  ) -> impl Future<Output = Result<Option<StoredFeed>, Self::Error>> + Send;

  /// Persist `payload` as the current entry for `feed`, replacing any
  /// previous entry as a unit.
  fn save(
    &self,
    feed: Feed,
    payload: &serde_json::Value,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
