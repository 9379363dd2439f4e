//! Async HTTP client for the registry table API.
//!
//! [`HttpStore`] implements [`RecordStore`], so a
//! [`RecordCache`](registry_core::RecordCache) can mirror a remote server
//! exactly as it would a local store. Each call is a single request; nothing
//! is retried.

use std::time::Duration;

use registry_core::{Person, PersonKey, PersonKind, RecordStore, RowError};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("server responded {status}: {body}")]
  Status { status: StatusCode, body: String },

  #[error("bad row: {0}")]
  Row(#[from] RowError),

  #[error("cannot update a {0} record without an id")]
  MissingId(PersonKind),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Config ───────────────────────────────────────────────────────────────────

/// Connection settings for the registry API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Server root; the API is expected under `/api`.
  pub base_url: String,
  /// Per-request timeout.
  pub timeout:  Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8080".to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Remote [`RecordStore`] over HTTP.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpStore {
  client: Client,
  config: ClientConfig,
}

impl HttpStore {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ClientConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn table_url(&self, kind: PersonKind) -> String { self.url(&format!("/{}", kind.table())) }

  fn row_url(&self, key: PersonKey) -> String {
    self.url(&format!("/{}/{}", key.kind.table(), key.id))
  }
}

/// Turn a non-success response into [`Error::Status`].
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Status { status, body })
}

async fn decode_rows(kind: PersonKind, resp: Response) -> Result<Vec<Person>> {
  let rows: Vec<Value> = check(resp).await?.json().await?;
  Ok(
    rows
      .into_iter()
      .map(|row| Person::from_row(kind, row))
      .collect::<Result<_, _>>()?,
  )
}

impl RecordStore for HttpStore {
  type Error = Error;

  /// `GET /api/{table}`
  async fn select(&self, kind: PersonKind) -> Result<Vec<Person>> {
    let resp = self.client.get(self.table_url(kind)).send().await?;
    decode_rows(kind, resp).await
  }

  /// `POST /api/{table}`
  async fn insert(&self, person: &Person) -> Result<Vec<Person>> {
    let kind = person.kind();
    let resp = self
      .client
      .post(self.table_url(kind))
      .json(&person.to_row()?)
      .send()
      .await?;
    decode_rows(kind, resp).await
  }

  /// `PATCH /api/{table}/{id}`
  async fn update(&self, person: &Person) -> Result<Vec<Person>> {
    let key = person.key().ok_or(Error::MissingId(person.kind()))?;
    let resp = self
      .client
      .patch(self.row_url(key))
      .json(&person.to_row()?)
      .send()
      .await?;
    decode_rows(key.kind, resp).await
  }

  /// `DELETE /api/{table}/{id}`
  async fn delete(&self, key: PersonKey) -> Result<()> {
    let resp = self.client.delete(self.row_url(key)).send().await?;
    check(resp).await?;
    tracing::debug!(%key, "remote row deleted");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn urls_are_rooted_under_api() {
    let store = HttpStore::new(ClientConfig {
      base_url: "http://registry.local:9000/".into(),
      ..ClientConfig::default()
    })
    .unwrap();
    assert_eq!(store.table_url(PersonKind::Child), "http://registry.local:9000/api/children");
    assert_eq!(
      store.row_url(PersonKey::new(PersonKind::Adult, 3)),
      "http://registry.local:9000/api/adults/3"
    );
  }
}
