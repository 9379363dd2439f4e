//! Error type for `registry-store-sqlite`.

use registry_core::PersonKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Updates are keyed by id, so the record must already be persisted.
  #[error("cannot update a {0} record without an id")]
  MissingId(PersonKind),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
