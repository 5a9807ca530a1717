//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use timegrid_core::feed::Feed;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No successful fetch has ever completed for the feed. Expected at
  /// cold start; clients should retry after the next refresh.
  #[error("feed `{0}` is not ready yet")]
  NotReady(Feed),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The upstream source failed during a fetch or refresh.
  #[error("upstream error: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<timegrid_cache::Error> for ApiError {
  fn from(e: timegrid_cache::Error) -> Self {
    match e {
      timegrid_cache::Error::NotReady { feed, .. } => ApiError::NotReady(feed),
      timegrid_cache::Error::Unregistered(feed) => {
        ApiError::NotFound(format!("feed `{feed}` is not served"))
      }
      e @ timegrid_cache::Error::Refresh { .. } => {
        ApiError::Upstream(Box::new(e))
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotReady(feed) => (
        StatusCode::SERVICE_UNAVAILABLE,
        format!("feed `{feed}` is not ready yet"),
      ),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Upstream(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
