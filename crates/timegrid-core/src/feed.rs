//! Feed names and the typed payloads cached per feed.
//!
//! A feed is one named external data source. Each refresh reshapes the
//! upstream JSON into one of the small payload types below before it is
//! cached; the raw upstream response is never retained.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One named external data source managed by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
  Weather,
  Dust,
  Meal,
  Calendar,
  Timetable,
}

impl Feed {
  pub const ALL: [Feed; 5] = [
    Feed::Weather,
    Feed::Dust,
    Feed::Meal,
    Feed::Calendar,
    Feed::Timetable,
  ];

  /// Stable lowercase name, used as the storage key and in URLs and logs.
  pub fn as_str(&self) -> &'static str {
    match self {
      Feed::Weather => "weather",
      Feed::Dust => "dust",
      Feed::Meal => "meal",
      Feed::Calendar => "calendar",
      Feed::Timetable => "timetable",
    }
  }
}

impl fmt::Display for Feed {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Feed {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "weather" => Ok(Feed::Weather),
      "dust" => Ok(Feed::Dust),
      "meal" => Ok(Feed::Meal),
      "calendar" => Ok(Feed::Calendar),
      "timetable" => Ok(Feed::Timetable),
      other => Err(Error::UnknownFeed(other.to_string())),
    }
  }
}

// ─── Feed payloads ───────────────────────────────────────────────────────────

/// Current weather conditions for the school's district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
  pub condition:     String,
  pub temperature_c: f64,
  pub humidity_pct:  Option<f64>,
  pub observed_at:   DateTime<Utc>,
}

/// Particulate readings from the nearest air-quality station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DustReport {
  pub station: String,
  pub pm10:    Option<u32>,
  pub pm25:    Option<u32>,
}

/// One day's cafeteria menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealMenu {
  pub date:   NaiveDate,
  pub dishes: Vec<String>,
}

/// A month of school calendar events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
  pub year:   i32,
  pub month:  u32,
  pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
  pub day:   u32,
  pub title: String,
}
