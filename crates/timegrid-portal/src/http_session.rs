//! [`HttpPortalSession`] — an HTTP approximation of the rendered-page
//! contract.
//!
//! The portal's page script does two fetchable things: it downloads a
//! generated dataset from a data endpoint and deposits it in page
//! storage. For portals whose endpoints are reachable directly, this
//! session replays that behaviour over plain HTTP: storage is an
//! in-process map, `reload` fetches the data endpoint (its URL template
//! expanded from storage values) into the dataset key, and
//! `extract_script_text` downloads the generator script source. A real
//! headless-browser session can replace this through the same trait.

use std::{collections::HashMap, sync::Arc, time::Duration};

use reqwest::Client;

use timegrid_core::session::{PageSession, SessionFactory};

use crate::error::{Error, Result};

/// Endpoints behind the portal page.
#[derive(Debug, Clone)]
pub struct HttpSessionConfig {
  /// The generator script source (the text a browser would see inside
  /// the page's script element).
  pub script_url: String,
  /// Data endpoint template; `{key}` placeholders are expanded from
  /// current storage values at reload time.
  pub data_url: String,
  /// Storage key the fetched dataset is deposited under, mirroring what
  /// the portal's own script does after a reload.
  pub dataset_key: String,
}

pub struct HttpPortalSession {
  client:  Client,
  config:  Arc<HttpSessionConfig>,
  storage: HashMap<String, String>,
}

impl PageSession for HttpPortalSession {
  type Error = Error;

  async fn navigate(&mut self, url: &str) -> Result<()> {
    // Prime the page (cookies, server-side session) but discard the body;
    // the dataset only exists after a reload with selection keys set.
    self.client.get(url).send().await?.error_for_status()?;
    Ok(())
  }

  async fn set_storage_value(&mut self, key: &str, value: &str) -> Result<()> {
    self.storage.insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn get_storage_value(&mut self, key: &str) -> Result<Option<String>> {
    Ok(self.storage.get(key).cloned())
  }

  async fn reload(&mut self) -> Result<()> {
    let url = expand_template(&self.config.data_url, &self.storage);
    let body = self
      .client
      .get(&url)
      .send()
      .await?
      .error_for_status()?
      .text()
      .await?;
    self.storage.insert(self.config.dataset_key.clone(), body);
    Ok(())
  }

  async fn extract_script_text(
    &mut self,
    _selector: &str,
  ) -> Result<Option<String>> {
    let response = self.client.get(&self.config.script_url).send().await?;
    if !response.status().is_success() {
      return Ok(None);
    }
    Ok(Some(response.text().await?))
  }

  async fn close(self) -> Result<()> {
    Ok(())
  }
}

/// Opens [`HttpPortalSession`]s sharing one connection pool.
pub struct HttpSessionFactory {
  client: Client,
  config: Arc<HttpSessionConfig>,
}

impl HttpSessionFactory {
  pub fn new(config: HttpSessionConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(15))
      .build()?;
    Ok(Self {
      client,
      config: Arc::new(config),
    })
  }
}

impl SessionFactory for HttpSessionFactory {
  type Session = HttpPortalSession;

  async fn open(&self) -> Result<HttpPortalSession> {
    Ok(HttpPortalSession {
      client:  self.client.clone(),
      config:  Arc::clone(&self.config),
      storage: HashMap::new(),
    })
  }
}

fn expand_template(template: &str, storage: &HashMap<String, String>) -> String {
  let mut url = template.to_string();
  for (key, value) in storage {
    url = url.replace(&format!("{{{key}}}"), value);
  }
  url
}
