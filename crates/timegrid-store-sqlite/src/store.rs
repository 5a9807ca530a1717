//! [`SqliteFeedStore`] — the SQLite implementation of [`FeedStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use serde_json::Value;

use timegrid_core::{
  feed::Feed,
  store::{FeedStore, StoredFeed},
};

use crate::{Error, Result, schema::SCHEMA};

/// A feed cache backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteFeedStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteFeedStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl FeedStore for SqliteFeedStore {
  type Error = Error;

  async fn load(&self, feed: Feed) -> Result<Option<StoredFeed>> {
    let row: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT payload, fetched_at FROM feed_cache WHERE feed = ?1",
            rusqlite::params![feed.as_str()],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    let Some((payload_json, fetched_at)) = row else {
      return Ok(None);
    };

    let payload: Value = serde_json::from_str(&payload_json)?;
    let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
      .map_err(|e| Error::DateParse(e.to_string()))?
      .with_timezone(&Utc);

    Ok(Some(StoredFeed {
      payload,
      fetched_at,
    }))
  }

  async fn save(&self, feed: Feed, payload: &Value) -> Result<()> {
    let payload_json = serde_json::to_string(payload)?;
    let fetched_at = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feed_cache (feed, payload, fetched_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(feed) DO UPDATE SET
             payload = excluded.payload,
             fetched_at = excluded.fetched_at",
          rusqlite::params![feed.as_str(), payload_json, fetched_at],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }
}
