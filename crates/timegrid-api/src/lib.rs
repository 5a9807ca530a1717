//! JSON REST API for Timegrid.
//!
//! Exposes an axum [`Router`] backed by an
//! [`timegrid_cache::ExternalDataCache`] over any
//! [`timegrid_core::store::FeedStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", timegrid_api::api_router(cache.clone()))
//! ```

pub mod error;
pub mod feeds;
pub mod timetable;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use timegrid_cache::ExternalDataCache;
use timegrid_core::store::FeedStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `cache`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(cache: Arc<ExternalDataCache<S>>) -> Router<()>
where
  S: FeedStore + 'static,
{
  Router::new()
    // Timetable reads
    .route(
      "/timetable/{grade}/{class}",
      get(timetable::get_week::<S>),
    )
    // Feeds
    .route("/feeds/{feed}", get(feeds::get_payload::<S>))
    .route("/feeds/{feed}/refresh", post(feeds::refresh::<S>))
    .with_state(cache)
}

// ─── Integration tests ───────────────────────────────────────────────────────
