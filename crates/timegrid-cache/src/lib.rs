//! Read-optimised cache and refresh scheduling for external data feeds.
//!
//! [`ExternalDataCache`] is a cache-aside store keyed by [`Feed`], with
//! one registered fetch function per feed and a [`FeedStore`] backend so
//! contents survive process restarts. [`RefreshScheduler`] keeps entries
//! fresh with independent periodic triggers, one per feed.
//!
//! [`Feed`]: timegrid_core::feed::Feed
//! [`FeedStore`]: timegrid_core::store::FeedStore

mod cache;
mod scheduler;

pub mod error;

pub use cache::{
  Builder, ExternalDataCache, FetchError, FetchFuture, RefreshOutcome,
};
pub use error::{Error, Result};
pub use scheduler::RefreshScheduler;
