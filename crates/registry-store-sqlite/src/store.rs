//! [`SqliteStore`], the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use registry_core::{Person, PersonKey, PersonKind, RecordStore};

use crate::{
  encode::{encode_date, encode_dt, RawAdult, RawChild, RawPerson},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The `adults` and `children` tables in a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn select(&self, kind: PersonKind) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let rows = match kind {
          PersonKind::Adult => {
            let mut stmt = conn
              .prepare(&format!("SELECT {} FROM adults ORDER BY id", RawAdult::COLUMNS))?;
            stmt
              .query_map([], RawAdult::from_row)?
              .map(|r| r.map(RawPerson::Adult))
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
          PersonKind::Child => {
            let mut stmt = conn
              .prepare(&format!("SELECT {} FROM children ORDER BY id", RawChild::COLUMNS))?;
            stmt
              .query_map([], RawChild::from_row)?
              .map(|r| r.map(RawPerson::Child))
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn insert(&self, person: &Person) -> Result<Vec<Person>> {
    let created_at = encode_dt(Utc::now());
    let dob        = encode_date(person.dob());
    let person     = person.clone();

    let raw: RawPerson = self
      .conn
      .call(move |conn| {
        let raw = match person {
          Person::Adult(a) => RawPerson::Adult(conn.query_row(
            &format!(
              "INSERT INTO adults (
                 name, nic, gender, dob, address, occupation, contact, created_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
               RETURNING {}",
              RawAdult::COLUMNS
            ),
            rusqlite::params![
              a.name,
              a.nic,
              a.gender,
              dob,
              a.address,
              a.occupation,
              a.contact,
              created_at,
            ],
            RawAdult::from_row,
          )?),
          Person::Child(c) => RawPerson::Child(conn.query_row(
            &format!(
              "INSERT INTO children (
                 name, gender, dob, parent_nic, school, grade, created_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               RETURNING {}",
              RawChild::COLUMNS
            ),
            rusqlite::params![
              c.name,
              c.gender,
              dob,
              c.parent_nic,
              c.school,
              c.grade,
              created_at,
            ],
            RawChild::from_row,
          )?),
        };
        Ok(raw)
      })
      .await?;

    let stored = raw.into_person()?;
    tracing::debug!(key = ?stored.key(), "inserted row");
    Ok(vec![stored])
  }

  async fn update(&self, person: &Person) -> Result<Vec<Person>> {
    let id     = person.id().ok_or(Error::MissingId(person.kind()))?;
    let dob    = encode_date(person.dob());
    let person = person.clone();

    // `nic` and `created_at` are never written after insert.
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let rows = match person {
          Person::Adult(a) => {
            let mut stmt = conn.prepare(&format!(
              "UPDATE adults
                 SET name = ?1, gender = ?2, dob = ?3,
                     address = ?4, occupation = ?5, contact = ?6
               WHERE id = ?7
               RETURNING {}",
              RawAdult::COLUMNS
            ))?;
            stmt
              .query_map(
                rusqlite::params![
                  a.name, a.gender, dob, a.address, a.occupation, a.contact, id,
                ],
                RawAdult::from_row,
              )?
              .map(|r| r.map(RawPerson::Adult))
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
          Person::Child(c) => {
            let mut stmt = conn.prepare(&format!(
              "UPDATE children
                 SET name = ?1, gender = ?2, dob = ?3,
                     parent_nic = ?4, school = ?5, grade = ?6
               WHERE id = ?7
               RETURNING {}",
              RawChild::COLUMNS
            ))?;
            stmt
              .query_map(
                rusqlite::params![
                  c.name, c.gender, dob, c.parent_nic, c.school, c.grade, id,
                ],
                RawChild::from_row,
              )?
              .map(|r| r.map(RawPerson::Child))
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn delete(&self, key: PersonKey) -> Result<()> {
    let table = key.kind.table();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE id = ?1"),
          rusqlite::params![key.id],
        )?)
      })
      .await?;

    tracing::debug!(%key, removed, "deleted row");
    Ok(())
  }
}
