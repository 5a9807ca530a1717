//! Integration tests for `SqliteFeedStore` against an in-memory database.

use serde_json::json;
use timegrid_core::{feed::Feed, store::FeedStore};

use crate::SqliteFeedStore;

async fn store() -> SqliteFeedStore {
  SqliteFeedStore::open_in_memory()
    .await
    .expect("in-memory store")
}

#[tokio::test]
async fn load_missing_feed_returns_none() {
  let s = store().await;
  assert!(s.load(Feed::Weather).await.unwrap().is_none());
}

#[tokio::test]
async fn save_and_load_round_trip() {
  let s = store().await;
  let payload = json!({"condition": "rain", "temperature_c": 14.5});

  s.save(Feed::Weather, &payload).await.unwrap();

  let stored = s.load(Feed::Weather).await.unwrap().unwrap();
  assert_eq!(stored.payload, payload);
}

#[tokio::test]
async fn save_replaces_the_entry_wholesale() {
  let s = store().await;
  s.save(Feed::Meal, &json!({"dishes": ["rice"]})).await.unwrap();
  s.save(Feed::Meal, &json!({"dishes": ["soup", "kimchi"]}))
    .await
    .unwrap();

  let stored = s.load(Feed::Meal).await.unwrap().unwrap();
  assert_eq!(stored.payload, json!({"dishes": ["soup", "kimchi"]}));
}

#[tokio::test]
async fn feeds_are_isolated_by_key() {
  let s = store().await;
  s.save(Feed::Weather, &json!("w")).await.unwrap();
  s.save(Feed::Dust, &json!("d")).await.unwrap();

  assert_eq!(s.load(Feed::Weather).await.unwrap().unwrap().payload, json!("w"));
  assert_eq!(s.load(Feed::Dust).await.unwrap().unwrap().payload, json!("d"));
  assert!(s.load(Feed::Timetable).await.unwrap().is_none());
}

#[tokio::test]
async fn fetched_at_is_recorded() {
  let s = store().await;
  let before = chrono::Utc::now() - chrono::Duration::seconds(5);

  s.save(Feed::Calendar, &json!([])).await.unwrap();

  let stored = s.load(Feed::Calendar).await.unwrap().unwrap();
  assert!(stored.fetched_at >= before);
}
