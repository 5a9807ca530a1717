//! Error type for `timegrid-portal`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The underlying page session failed (navigation, storage access,
  /// extraction).
  #[error("portal session error: {0}")]
  Session(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The portal's script never populated the dataset storage key within
  /// the settle deadline.
  #[error("portal dataset was not populated within {0:?}")]
  SettleTimeout(Duration),

  #[error("portal dataset is not valid JSON: {0}")]
  MalformedDataset(#[from] serde_json::Error),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// A feed endpoint answered with JSON missing the fields we reshape.
  #[error("unexpected response shape from feed `{feed}`")]
  Shape { feed: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
