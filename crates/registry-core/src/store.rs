//! The `RecordStore` trait: the remote relational store the cache mirrors.
//!
//! The trait is implemented by storage backends (`registry-store-sqlite`) and
//! by the HTTP client (`registry-client`). [`RecordCache`] depends on this
//! abstraction, not on any concrete backend.
//!
//! [`RecordCache`]: crate::cache::RecordCache

use std::future::Future;

use crate::person::{Person, PersonKey, PersonKind};

/// Table-level access to the `adults` and `children` tables.
///
/// The table for `insert` and `update` is taken from the record's variant.
/// `id` and `created_at` are always assigned by the store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every row of the table for `kind`.
  fn select(
    &self,
    kind: PersonKind,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Insert a record and return the stored row(s). Any `id` or `created_at`
  /// on the input is ignored.
  fn insert<'a>(
    &'a self,
    person: &'a Person,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Overwrite the row whose id matches `person`'s and return the updated
  /// row(s). An unmatched id yields an empty vector, not an error.
  fn update<'a>(
    &'a self,
    person: &'a Person,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Delete the row for `key`. Deleting a missing row succeeds.
  fn delete(
    &self,
    key: PersonKey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
