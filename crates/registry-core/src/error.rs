//! Error types for `registry-core`.

use thiserror::Error;

use crate::person::{PersonKey, PersonKind};

/// A problem with a single record, independent of any store.
#[derive(Debug, Error)]
pub enum RowError {
  #[error("{kind} record is missing required field `{field}`")]
  MissingField {
    kind:  PersonKind,
    field: &'static str,
  },

  #[error("row encoding error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// An error surfaced by [`RecordCache`](crate::cache::RecordCache).
///
/// `E` is the backing store's error type.
#[derive(Debug, Error)]
pub enum Error<E> {
  /// The remote mutation failed; the cache was left untouched.
  #[error("store error: {0}")]
  Store(#[source] E),

  /// A sub-fetch failed while loading under
  /// [`LoadPolicy::Atomic`](crate::cache::LoadPolicy::Atomic).
  #[error("failed to load {kind} records: {source}")]
  Load {
    kind:   PersonKind,
    #[source]
    source: E,
  },

  #[error("{0} record has no id")]
  MissingId(PersonKind),

  /// The store matched no row for an update.
  #[error("{0} not found")]
  NotFound(PersonKey),

  #[error("invalid record: {0}")]
  Invalid(#[from] RowError),

  #[error("expected {expected} row, store returned {actual}")]
  VariantMismatch {
    expected: PersonKind,
    actual:   PersonKind,
  },
}

pub type Result<T, E = RowError> = std::result::Result<T, E>;
