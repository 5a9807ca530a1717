//! HTTP clients for the non-timetable feeds.
//!
//! Each fetch reshapes the upstream JSON into one of the small typed
//! payloads in `timegrid_core::feed` before it is cached; unexpected
//! shapes fail the fetch rather than caching junk. Optional fields are
//! tolerated, required ones are not.

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;

use timegrid_core::feed::{
  CalendarEvent, CalendarMonth, DustReport, MealMenu, WeatherReport,
};

use crate::error::{Error, Result};

/// Endpoint URLs for the four plain-HTTP feeds.
#[derive(Debug, Clone)]
pub struct FeedEndpoints {
  pub weather_url:  String,
  pub dust_url:     String,
  pub meal_url:     String,
  pub calendar_url: String,
}

/// Async HTTP client for the non-timetable feeds.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FeedClient {
  client:    Client,
  endpoints: FeedEndpoints,
}

impl FeedClient {
  pub fn new(endpoints: FeedEndpoints) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(15))
      .build()?;
    Ok(Self { client, endpoints })
  }

  pub async fn fetch_weather(&self) -> Result<WeatherReport> {
    let body = self.get_json(&self.endpoints.weather_url).await?;
    weather_from_json(&body)
  }

  pub async fn fetch_dust(&self) -> Result<DustReport> {
    let body = self.get_json(&self.endpoints.dust_url).await?;
    dust_from_json(&body)
  }

  pub async fn fetch_meal(&self) -> Result<MealMenu> {
    let body = self.get_json(&self.endpoints.meal_url).await?;
    meal_from_json(&body)
  }

  pub async fn fetch_calendar(&self) -> Result<CalendarMonth> {
    let body = self.get_json(&self.endpoints.calendar_url).await?;
    calendar_from_json(&body)
  }

  async fn get_json(&self, url: &str) -> Result<Value> {
    Ok(
      self
        .client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?,
    )
  }
}

// ─── Reshaping ───────────────────────────────────────────────────────────────

fn weather_from_json(body: &Value) -> Result<WeatherReport> {
  let temperature_c = body
    .get("temperature")
    .and_then(Value::as_f64)
    .ok_or(Error::Shape { feed: "weather" })?;

  Ok(WeatherReport {
    condition: body
      .get("condition")
      .and_then(Value::as_str)
      .unwrap_or("")
      .to_string(),
    temperature_c,
    humidity_pct: body.get("humidity").and_then(Value::as_f64),
    observed_at: Utc::now(),
  })
}

fn dust_from_json(body: &Value) -> Result<DustReport> {
  let pm10 = u32_field(body, "pm10");
  let pm25 = u32_field(body, "pm25");
  if pm10.is_none() && pm25.is_none() {
    return Err(Error::Shape { feed: "dust" });
  }

  Ok(DustReport {
    station: body
      .get("station")
      .and_then(Value::as_str)
      .unwrap_or("")
      .to_string(),
    pm10,
    pm25,
  })
}

fn meal_from_json(body: &Value) -> Result<MealMenu> {
  let date = body
    .get("date")
    .and_then(Value::as_str)
    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    .ok_or(Error::Shape { feed: "meal" })?;

  let dishes = body
    .get("dishes")
    .and_then(Value::as_array)
    .map(|items| {
      items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
    })
    .unwrap_or_default();

  Ok(MealMenu { date, dishes })
}

fn calendar_from_json(body: &Value) -> Result<CalendarMonth> {
  let year = body
    .get("year")
    .and_then(Value::as_i64)
    .ok_or(Error::Shape { feed: "calendar" })? as i32;
  let month = body
    .get("month")
    .and_then(Value::as_u64)
    .filter(|m| (1..=12).contains(m))
    .ok_or(Error::Shape { feed: "calendar" })? as u32;

  let events = body
    .get("events")
    .and_then(Value::as_array)
    .map(|items| {
      items
        .iter()
        .filter_map(|event| {
          Some(CalendarEvent {
            day:   event.get("day").and_then(Value::as_u64)? as u32,
            title: event.get("title").and_then(Value::as_str)?.to_string(),
          })
        })
        .collect()
    })
    .unwrap_or_default();

  Ok(CalendarMonth {
    year,
    month,
    events,
  })
}

fn u32_field(body: &Value, key: &str) -> Option<u32> {
  body.get(key).and_then(Value::as_u64).map(|n| n as u32)
}
