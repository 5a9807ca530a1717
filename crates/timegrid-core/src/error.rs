//! Error types for `timegrid-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown feed name: {0:?}")]
  UnknownFeed(String),

  #[error("no class {class} in grade {grade}")]
  UnknownClass { grade: usize, class: usize },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
