//! Error type for `timegrid-cache`.

use thiserror::Error;
use timegrid_core::feed::Feed;

#[derive(Debug, Error)]
pub enum Error {
  /// The feed has no registered fetch function.
  #[error("feed `{0}` has no registered fetcher")]
  Unregistered(Feed),

  /// A read found no cached value and the populating fetch failed: no
  /// successful fetch has ever completed for this feed. Expected at cold
  /// start; distinct from a failed refresh of an already-populated feed.
  #[error("feed `{feed}` is not ready: {source}")]
  NotReady {
    feed:   Feed,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// An explicit refresh failed. The previous cached value, if any, is
  /// left intact.
  #[error("refresh of feed `{feed}` failed: {source}")]
  Refresh {
    feed:   Feed,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
