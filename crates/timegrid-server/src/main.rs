//! timegrid server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite-backed feed cache, wires the portal and feed fetchers, spawns
//! the refresh scheduler, and serves the JSON API over HTTP.

mod config;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use timegrid_cache::{ExternalDataCache, FetchError, RefreshScheduler};
use timegrid_core::feed::Feed;
use timegrid_portal::{
  FeedClient, FeedEndpoints, HttpSessionConfig, HttpSessionFactory,
  PortalClient, PortalConfig,
};
use timegrid_store_sqlite::SqliteFeedStore;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Timegrid timetable server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = ::config::Config::builder()
    .add_source(::config::File::from(cli.config).required(false))
    .add_source(::config::Environment::with_prefix("TIMEGRID"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite-backed feed store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteFeedStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Portal client over the HTTP page-session approximation.
  let portal_cfg = PortalConfig::new(
    server_cfg.portal.page_url.clone(),
    server_cfg.portal.school_name.clone(),
    server_cfg.portal.school_code.clone(),
  );
  let session_factory = HttpSessionFactory::new(HttpSessionConfig {
    script_url:  server_cfg.portal.script_url.clone(),
    data_url:    server_cfg.portal.data_url.clone(),
    dataset_key: portal_cfg.dataset_key.clone(),
  })
  .context("failed to build portal HTTP session factory")?;
  let portal = Arc::new(PortalClient::new(session_factory, portal_cfg));

  // Plain-HTTP feed clients.
  let feeds = Arc::new(
    FeedClient::new(FeedEndpoints {
      weather_url:  server_cfg.feeds.weather_url.clone(),
      dust_url:     server_cfg.feeds.dust_url.clone(),
      meal_url:     server_cfg.feeds.meal_url.clone(),
      calendar_url: server_cfg.feeds.calendar_url.clone(),
    })
    .context("failed to build feed HTTP client")?,
  );

  // One registered fetch function per feed.
  let cache = {
    let weather = Arc::clone(&feeds);
    let dust = Arc::clone(&feeds);
    let meal = Arc::clone(&feeds);
    let calendar = Arc::clone(&feeds);
    let portal = Arc::clone(&portal);

    Arc::new(
      ExternalDataCache::builder(store)
        .fetch_timeout(Duration::from_secs(server_cfg.fetch_timeout_secs))
        .register(Feed::Weather, move || {
          let client = Arc::clone(&weather);
          async move {
            let report = client.fetch_weather().await?;
            Ok::<_, FetchError>(serde_json::to_value(report)?)
          }
        })
        .register(Feed::Dust, move || {
          let client = Arc::clone(&dust);
          async move {
            let report = client.fetch_dust().await?;
            Ok::<_, FetchError>(serde_json::to_value(report)?)
          }
        })
        .register(Feed::Meal, move || {
          let client = Arc::clone(&meal);
          async move {
            let menu = client.fetch_meal().await?;
            Ok::<_, FetchError>(serde_json::to_value(menu)?)
          }
        })
        .register(Feed::Calendar, move || {
          let client = Arc::clone(&calendar);
          async move {
            let month = client.fetch_calendar().await?;
            Ok::<_, FetchError>(serde_json::to_value(month)?)
          }
        })
        .register(Feed::Timetable, move || {
          let portal = Arc::clone(&portal);
          async move {
            let table = portal.fetch_timetable().await?;
            Ok::<_, FetchError>(serde_json::to_value(table)?)
          }
        })
        .build(),
    )
  };

  // Independent periodic refresh per feed.
  let cadence = &server_cfg.cadence;
  RefreshScheduler::new(Arc::clone(&cache))
    .every(Feed::Weather, Duration::from_secs(cadence.weather_secs))
    .every(Feed::Dust, Duration::from_secs(cadence.dust_secs))
    .every(Feed::Meal, Duration::from_secs(cadence.meal_secs))
    .every(Feed::Calendar, Duration::from_secs(cadence.calendar_secs))
    .every(Feed::Timetable, Duration::from_secs(cadence.timetable_secs))
    .spawn();

  let app = timegrid_api::api_router(cache).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
