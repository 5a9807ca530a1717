//! [`PortalClient`] — drives a [`PageSession`] through the portal's
//! fetch sequence and decodes the result.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use timegrid_core::{
  period::NameTable,
  session::{PageSession, SessionFactory},
  timetable::GradeTimetable,
};
use timegrid_decode::{ScriptPatterns, assemble, resolve_indexes};

use crate::error::{Error, Result};

/// Portal location and the storage protocol the portal's script speaks.
#[derive(Debug, Clone)]
pub struct PortalConfig {
  pub page_url:    String,
  /// School selection, written into page storage before the reload.
  pub school_name: String,
  pub school_code: String,

  pub school_name_key: String,
  pub school_code_key: String,
  pub reset_key:       String,
  /// The storage key the portal's own script populates with the dataset.
  pub dataset_key:     String,
  pub script_selector: String,

  /// Deadline for the dataset key to become non-empty after the reload.
  pub settle_timeout: Duration,
  pub poll_interval:  Duration,
}

impl PortalConfig {
  pub fn new(
    page_url: impl Into<String>,
    school_name: impl Into<String>,
    school_code: impl Into<String>,
  ) -> Self {
    Self {
      page_url:        page_url.into(),
      school_name:     school_name.into(),
      school_code:     school_code.into(),
      school_name_key: "school_name".to_string(),
      school_code_key: "school_code".to_string(),
      reset_key:       "reset".to_string(),
      dataset_key:     "sc_data".to_string(),
      script_selector: "script".to_string(),
      settle_timeout:  Duration::from_secs(10),
      poll_interval:   Duration::from_millis(250),
    }
  }
}

/// One-shot timetable fetcher over fresh [`PageSession`]s.
pub struct PortalClient<F: SessionFactory> {
  factory:  F,
  config:   PortalConfig,
  patterns: ScriptPatterns,
}

impl<F: SessionFactory> PortalClient<F> {
  pub fn new(factory: F, config: PortalConfig) -> Self {
    Self {
      factory,
      config,
      patterns: ScriptPatterns::default(),
    }
  }

  /// Swap the index resolution strategy, e.g. after the portal's
  /// generator changes shape.
  pub fn with_patterns(mut self, patterns: ScriptPatterns) -> Self {
    self.patterns = patterns;
    self
  }

  /// Run the full fetch sequence: navigate → select school → reload →
  /// wait for the dataset → extract script → resolve indexes → assemble.
  ///
  /// Structural drift (missing script, unresolved indexes) degrades to an
  /// empty timetable with a warning; session errors and the settle
  /// deadline are hard errors. The session is closed either way.
  pub async fn fetch_timetable(&self) -> Result<GradeTimetable> {
    let mut session = self.factory.open().await.map_err(session_error)?;

    let outcome = self.drive(&mut session).await;

    if let Err(e) = session.close().await {
      debug!(error = %e, "portal session close failed");
    }

    let timetable = outcome?;
    if timetable.is_empty() {
      warn!("assembled timetable is empty; portal shape may have changed");
    }
    Ok(timetable)
  }

  async fn drive(&self, session: &mut F::Session) -> Result<GradeTimetable> {
    let cfg = &self.config;

    session.navigate(&cfg.page_url).await.map_err(session_error)?;
    session
      .set_storage_value(&cfg.school_name_key, &cfg.school_name)
      .await
      .map_err(session_error)?;
    session
      .set_storage_value(&cfg.school_code_key, &cfg.school_code)
      .await
      .map_err(session_error)?;
    session
      .set_storage_value(&cfg.reset_key, "1")
      .await
      .map_err(session_error)?;
    session.reload().await.map_err(session_error)?;

    let raw_text = self.await_dataset(session).await?;
    let raw: Value = serde_json::from_str(&raw_text)?;

    let script = session
      .extract_script_text(&cfg.script_selector)
      .await
      .map_err(session_error)?
      .unwrap_or_default();
    if script.is_empty() {
      warn!(
        selector = %cfg.script_selector,
        "portal script element missing; all index lookups will miss"
      );
    }

    let indexes = resolve_indexes(&script, &self.patterns);
    if !indexes.is_complete() {
      warn!(?indexes, "portal generated script changed shape; unresolved roles decode empty");
    }

    let subjects = self.name_table(&raw, &indexes.subjects);
    let teachers = self.name_table(&raw, &indexes.teachers);
    let matrix = self
      .patterns
      .dataset_key(&indexes.timetable)
      .and_then(|key| raw.get(&key).cloned())
      .unwrap_or(Value::Null);

    Ok(assemble(&matrix, &subjects, &teachers))
  }

  /// Poll the dataset storage key until the portal's script has populated
  /// it, up to the settle deadline. The source's flat fixed sleep was a
  /// race; polling verifies readiness instead of hoping.
  async fn await_dataset(&self, session: &mut F::Session) -> Result<String> {
    let cfg = &self.config;
    let deadline = tokio::time::Instant::now() + cfg.settle_timeout;

    loop {
      let value = session
        .get_storage_value(&cfg.dataset_key)
        .await
        .map_err(session_error)?;
      if let Some(text) = value
        && !text.is_empty()
      {
        return Ok(text);
      }
      if tokio::time::Instant::now() >= deadline {
        return Err(Error::SettleTimeout(cfg.settle_timeout));
      }
      tokio::time::sleep(cfg.poll_interval).await;
    }
  }

  fn name_table(&self, raw: &Value, suffix: &str) -> NameTable {
    self
      .patterns
      .dataset_key(suffix)
      .and_then(|key| raw.get(&key).map(NameTable::from_json))
      .unwrap_or_default()
  }
}

fn session_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Session(Box::new(e))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{Arc, Mutex},
  };

  use serde_json::json;
  use timegrid_core::period::PeriodEntry;

  const SCRIPT: &str =
    "var 긴과목명=자료492;var 성명=자료481;일일자료=자료147[주간];";

  fn dataset() -> String {
    // One grade, one class, week of [header, two days], days of
    // [header_cell, two periods].
    json!({
      "자료147": [[[
        [0],
        [0, 7103, 207],
        [0, 0, 7103],
      ]]],
      "자료492": ["", "", "", "Math", "", "", "", "English"],
      "자료481": {
        "0": "unused"
      },
    })
    .to_string()
  }

  /// Scripted in-memory [`PageSession`].
  struct FakeSession {
    script:       Option<String>,
    dataset:      Option<String>,
    /// Number of storage polls that miss before the dataset appears.
    polls_before_ready: usize,
    reloaded:     bool,
    storage:      Arc<Mutex<HashMap<String, String>>>,
  }

  impl FakeSession {
    fn new(script: Option<&str>, dataset: Option<String>) -> Self {
      Self {
        script: script.map(str::to_string),
        dataset,
        polls_before_ready: 0,
        reloaded: false,
        storage: Arc::new(Mutex::new(HashMap::new())),
      }
    }
  }

  impl PageSession for FakeSession {
    type Error = Infallible;

    async fn navigate(&mut self, _url: &str) -> Result<(), Infallible> {
      Ok(())
    }

    async fn set_storage_value(
      &mut self,
      key: &str,
      value: &str,
    ) -> Result<(), Infallible> {
      self
        .storage
        .lock()
        .unwrap()
        .insert(key.to_string(), value.to_string());
      Ok(())
    }

    async fn get_storage_value(
      &mut self,
      key: &str,
    ) -> Result<Option<String>, Infallible> {
      if key == "sc_data" {
        if !self.reloaded {
          return Ok(None);
        }
        if self.polls_before_ready > 0 {
          self.polls_before_ready -= 1;
          return Ok(None);
        }
        return Ok(self.dataset.clone());
      }
      Ok(self.storage.lock().unwrap().get(key).cloned())
    }

    async fn reload(&mut self) -> Result<(), Infallible> {
      self.reloaded = true;
      Ok(())
    }

    async fn extract_script_text(
      &mut self,
      _selector: &str,
    ) -> Result<Option<String>, Infallible> {
      Ok(self.script.clone())
    }

    async fn close(self) -> Result<(), Infallible> {
      Ok(())
    }
  }

  /// Hands out a single prepared session.
  struct FakeFactory {
    session: Mutex<Option<FakeSession>>,
    storage: Arc<Mutex<HashMap<String, String>>>,
  }

  impl FakeFactory {
    fn new(session: FakeSession) -> Self {
      let storage = Arc::clone(&session.storage);
      Self {
        session: Mutex::new(Some(session)),
        storage,
      }
    }
  }

  impl SessionFactory for FakeFactory {
    type Session = FakeSession;

    async fn open(&self) -> Result<FakeSession, Infallible> {
      Ok(self.session.lock().unwrap().take().expect("one session per test"))
    }
  }

  fn config() -> PortalConfig {
    let mut cfg =
      PortalConfig::new("http://portal.example/st", "Varden High", "24073");
    cfg.settle_timeout = Duration::from_secs(2);
    cfg.poll_interval = Duration::from_millis(100);
    cfg
  }

  #[tokio::test]
  async fn full_fetch_decodes_the_timetable() {
    let factory =
      FakeFactory::new(FakeSession::new(Some(SCRIPT), Some(dataset())));
    let storage = Arc::clone(&factory.storage);
    let client = PortalClient::new(factory, config());

    let table = client.fetch_timetable().await.unwrap();

    let week = table.week(0, 0).unwrap();
    assert_eq!(week.days.len(), 2);
    assert_eq!(week.days[0].periods.len(), 2);
    // 7103: subject 03 = "Math"; teacher table failed closed (not an
    // array) so the teacher is empty.
    assert_eq!(week.days[0].periods[0], PeriodEntry::new("Math", ""));
    assert_eq!(week.days[0].periods[1], PeriodEntry::new("English", ""));
    assert_eq!(week.days[1].periods[0], PeriodEntry::empty());

    // The selection keys were written before the reload.
    let storage = storage.lock().unwrap();
    assert_eq!(storage.get("school_name").map(String::as_str), Some("Varden High"));
    assert_eq!(storage.get("school_code").map(String::as_str), Some("24073"));
    assert_eq!(storage.get("reset").map(String::as_str), Some("1"));
  }

  #[tokio::test]
  async fn missing_script_yields_an_empty_timetable() {
    let factory = FakeFactory::new(FakeSession::new(None, Some(dataset())));
    let client = PortalClient::new(factory, config());

    let table = client.fetch_timetable().await.unwrap();
    assert!(table.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn dataset_never_populating_is_a_settle_timeout() {
    let factory = FakeFactory::new(FakeSession::new(Some(SCRIPT), None));
    let client = PortalClient::new(factory, config());

    let err = client.fetch_timetable().await.unwrap_err();
    assert!(matches!(err, Error::SettleTimeout(_)));
  }

  #[tokio::test(start_paused = true)]
  async fn polling_tolerates_slow_population() {
    let mut session = FakeSession::new(Some(SCRIPT), Some(dataset()));
    session.polls_before_ready = 3;
    let client = PortalClient::new(FakeFactory::new(session), config());

    let table = client.fetch_timetable().await.unwrap();
    assert!(table.week(0, 0).is_some());
  }

  #[tokio::test]
  async fn malformed_dataset_is_a_hard_error() {
    let factory = FakeFactory::new(FakeSession::new(
      Some(SCRIPT),
      Some("not json at all".to_string()),
    ));
    let client = PortalClient::new(factory, config());

    let err = client.fetch_timetable().await.unwrap_err();
    assert!(matches!(err, Error::MalformedDataset(_)));
  }
}
