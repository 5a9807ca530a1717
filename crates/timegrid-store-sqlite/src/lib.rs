//! SQLite backend for the Timegrid feed cache.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. One row per feed; cached
//! payloads survive process restarts but carry no expiry.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteFeedStore;

#[cfg(test)]
mod tests;
