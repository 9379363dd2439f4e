//! [`RecordCache`], the merged in-memory mirror of both tables.
//!
//! The cache never holds a speculative record: every mutation first goes to
//! the store, and the cache is only touched once the store confirms. A failed
//! mutation leaves the cache exactly as it was.

use std::sync::Arc;

use crate::{
  error::Error,
  person::{Person, PersonKey, PersonKind},
  store::RecordStore,
  summary::Summary,
  view::{self, ViewQuery},
};

// ─── Load policy ─────────────────────────────────────────────────────────────

/// How [`RecordCache::load`] treats a failed sub-fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
  /// Log the failure and keep whatever the other table returned.
  #[default]
  BestEffort,
  /// Any failure aborts the load and leaves the cache untouched.
  Atomic,
}

/// Outcome of a load that was allowed to complete.
#[derive(Debug)]
pub struct LoadReport<E> {
  pub adults:   usize,
  pub children: usize,
  /// Tables skipped under [`LoadPolicy::BestEffort`], either because the
  /// fetch failed or because it returned rows of the wrong variant.
  pub failures: Vec<(PersonKind, Error<E>)>,
}

impl<E> LoadReport<E> {
  pub fn is_complete(&self) -> bool { self.failures.is_empty() }

  pub fn total(&self) -> usize { self.adults + self.children }
}

// ─── Cache ───────────────────────────────────────────────────────────────────

/// Client-side mirror of the `adults` and `children` tables.
///
/// Mutating methods take `&mut self`, so at most one operation is in flight
/// per cache. Changes made to the store by anyone else are only picked up by
/// the next [`load`](Self::load).
pub struct RecordCache<S: RecordStore> {
  store:   Arc<S>,
  policy:  LoadPolicy,
  persons: Vec<Person>,
}

impl<S: RecordStore> RecordCache<S> {
  /// An empty cache over `store`. Call [`load`](Self::load) to populate it.
  pub fn new(store: Arc<S>) -> Self { Self::with_policy(store, LoadPolicy::default()) }

  pub fn with_policy(store: Arc<S>, policy: LoadPolicy) -> Self {
    Self { store, policy, persons: Vec::new() }
  }

  pub fn policy(&self) -> LoadPolicy { self.policy }

  /// The current snapshot, adults and children interleaved in load order.
  pub fn persons(&self) -> &[Person] { &self.persons }

  pub fn get(&self, key: PersonKey) -> Option<&Person> {
    self.persons.iter().find(|p| p.key() == Some(key))
  }

  pub fn len(&self) -> usize { self.persons.len() }

  pub fn is_empty(&self) -> bool { self.persons.is_empty() }

  // ── Load ──────────────────────────────────────────────────────────────────

  /// Fetch both tables and replace the whole snapshot.
  ///
  /// Under [`LoadPolicy::BestEffort`] this never fails: a table that cannot
  /// be fetched, or that comes back with rows of the wrong variant, is
  /// logged and listed in the report while the other table still loads.
  pub async fn load(&mut self) -> Result<LoadReport<S::Error>, Error<S::Error>> {
    let mut fresh = Vec::new();
    let mut report = LoadReport { adults: 0, children: 0, failures: Vec::new() };

    for kind in PersonKind::ALL {
      let fetched = self
        .store
        .select(kind)
        .await
        .map_err(|source| Error::Load { kind, source })
        .and_then(|rows| check_variants(kind, &rows).map(|()| rows));

      match fetched {
        Ok(rows) => {
          match kind {
            PersonKind::Adult => report.adults = rows.len(),
            PersonKind::Child => report.children = rows.len(),
          }
          fresh.extend(rows);
        }
        Err(e) if self.policy == LoadPolicy::Atomic => return Err(e),
        Err(e) => {
          tracing::warn!(table = kind.table(), error = %e, "failed to fetch records");
          report.failures.push((kind, e));
        }
      }
    }

    tracing::debug!(
      adults = report.adults,
      children = report.children,
      "record cache loaded"
    );
    self.persons = fresh;
    Ok(report)
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Insert `person` into its table and append the stored row.
  ///
  /// If the store answers with a row of the other variant the insert has
  /// already been committed remotely, but nothing is cached; the error is
  /// logged and only a [`load`](Self::load) brings the cache back in step.
  pub async fn add(&mut self, person: Person) -> Result<(), Error<S::Error>> {
    person.validate()?;
    let rows = self.store.insert(&person).await.map_err(Error::Store)?;
    confirmed_variants(person.kind(), &rows, "insert")?;

    tracing::debug!(table = person.kind().table(), rows = rows.len(), "record added");
    self.persons.extend(rows);
    Ok(())
  }

  /// Overwrite the stored row for `person` and replace its cache entry.
  ///
  /// An entry missing from a stale cache is appended. A confirmed update
  /// that returns a row of the other variant leaves the entry as it was,
  /// like [`add`](Self::add).
  pub async fn update(&mut self, person: Person) -> Result<(), Error<S::Error>> {
    let key = person.key().ok_or(Error::MissingId(person.kind()))?;
    person.validate()?;
    let rows = self.store.update(&person).await.map_err(Error::Store)?;
    confirmed_variants(key.kind, &rows, "update")?;

    let Some(updated) = rows.into_iter().next() else {
      return Err(Error::NotFound(key));
    };

    tracing::debug!(%key, "record updated");
    match self.persons.iter_mut().find(|p| p.key() == Some(key)) {
      Some(slot) => *slot = updated,
      None => self.persons.push(updated),
    }
    Ok(())
  }

  /// Delete the record `id` from the table for `kind`.
  ///
  /// The kind is required because ids are only unique per table.
  pub async fn delete(&mut self, id: i64, kind: PersonKind) -> Result<(), Error<S::Error>> {
    let key = PersonKey::new(kind, id);
    self.store.delete(key).await.map_err(Error::Store)?;

    tracing::debug!(%key, "record deleted");
    self.persons.retain(|p| p.key() != Some(key));
    Ok(())
  }

  // ── Derived reads ─────────────────────────────────────────────────────────

  /// The filtered, searched and sorted projection of the snapshot.
  pub fn view(&self, query: &ViewQuery) -> Vec<&Person> { view::view(&self.persons, query) }

  pub fn summary(&self) -> Summary { Summary::of(&self.persons) }
}

fn check_variants<E>(expected: PersonKind, rows: &[Person]) -> Result<(), Error<E>> {
  match rows.iter().find(|r| r.kind() != expected) {
    Some(row) => Err(Error::VariantMismatch { expected, actual: row.kind() }),
    None => Ok(()),
  }
}

/// [`check_variants`] for rows answering a committed mutation, where a
/// mismatch means the store and the cache have drifted apart.
fn confirmed_variants<E>(
  expected: PersonKind,
  rows: &[Person],
  op: &'static str,
) -> Result<(), Error<E>> {
  check_variants(expected, rows).inspect_err(|_| {
    tracing::warn!(
      table = expected.table(),
      op,
      "store committed a mutation but returned rows of the wrong variant; reload to resync"
    );
  })
}
