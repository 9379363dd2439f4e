//! JSON REST API over the registry tables.
//!
//! Exposes an axum [`Router`] backed by any [`registry_core::RecordStore`],
//! giving remote clients table-level select/insert/update/delete. Auth, TLS,
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", registry_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod records;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::{get, patch}};
use registry_core::RecordStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from the config file and
/// `REGISTRY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("registry.db"),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/{table}", get(records::list::<S>).post(records::create::<S>))
    .route(
      "/{table}/{id}",
      patch(records::update_one::<S>).delete(records::delete_one::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
