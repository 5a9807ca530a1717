//! Runtime server configuration, deserialised from `config.toml`.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,

  /// Bound on one fetch sequence, navigation and settle polling included.
  #[serde(default = "default_fetch_timeout_secs")]
  pub fetch_timeout_secs: u64,

  pub portal:  PortalSettings,
  pub feeds:   FeedSettings,
  #[serde(default)]
  pub cadence: CadenceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalSettings {
  /// The portal page itself.
  pub page_url: String,
  /// The generator script source behind the page.
  pub script_url: String,
  /// Dataset endpoint template; `{school_code}` etc. are expanded from
  /// the selection keys the fetch sequence writes.
  pub data_url: String,

  pub school_name: String,
  pub school_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
  pub weather_url:  String,
  pub dust_url:     String,
  pub meal_url:     String,
  pub calendar_url: String,
}

/// Per-feed refresh cadence, in seconds. Policy, not correctness: each
/// feed ticks independently.
#[derive(Debug, Clone, Deserialize)]
pub struct CadenceSettings {
  #[serde(default = "default_hourly")]
  pub weather_secs: u64,
  #[serde(default = "default_hourly")]
  pub dust_secs: u64,
  #[serde(default = "default_daily")]
  pub meal_secs: u64,
  #[serde(default = "default_daily")]
  pub calendar_secs: u64,
  #[serde(default = "default_four_hourly")]
  pub timetable_secs: u64,
}

impl Default for CadenceSettings {
  fn default() -> Self {
    Self {
      weather_secs:   default_hourly(),
      dust_secs:      default_hourly(),
      meal_secs:      default_daily(),
      calendar_secs:  default_daily(),
      timetable_secs: default_four_hourly(),
    }
  }
}

fn default_fetch_timeout_secs() -> u64 {
  30
}

fn default_hourly() -> u64 {
  3600
}

fn default_daily() -> u64 {
  86400
}

fn default_four_hourly() -> u64 {
  4 * 3600
}
