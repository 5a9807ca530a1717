//! Handlers for `/feeds/{feed}` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/feeds/{feed}` | Raw cached payload; populates on miss |
//! | `POST` | `/feeds/{feed}/refresh` | Force refresh now; idempotent |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::{Value, json};

use timegrid_cache::ExternalDataCache;
use timegrid_core::{feed::Feed, store::FeedStore};

use crate::error::ApiError;

fn parse_feed(name: &str) -> Result<Feed, ApiError> {
  name
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("unknown feed name: {name:?}")))
}

/// `GET /feeds/{feed}` — the current cached payload (cache-aside).
pub async fn get_payload<S>(
  State(cache): State<Arc<ExternalDataCache<S>>>,
  Path(feed): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FeedStore,
{
  let feed = parse_feed(&feed)?;
  let payload = cache.get(feed).await?;
  Ok(Json(payload))
}

/// `POST /feeds/{feed}/refresh` — administrative force-refresh. Safe to
/// call concurrently with scheduled refreshes; an in-flight refresh is
/// reported as `skipped`.
pub async fn refresh<S>(
  State(cache): State<Arc<ExternalDataCache<S>>>,
  Path(feed): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: FeedStore,
{
  let feed = parse_feed(&feed)?;
  let outcome = cache.refresh(feed).await?;
  Ok(Json(json!({
    "feed": feed.as_str(),
    "outcome": outcome.as_str(),
  })))
}
