//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and birth dates as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use registry_core::{Adult, Child, Person};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `adults` row.
pub struct RawAdult {
  pub id:         i64,
  pub name:       String,
  pub nic:        String,
  pub gender:     String,
  pub dob:        String,
  pub address:    String,
  pub occupation: String,
  pub contact:    String,
  pub created_at: String,
}

impl RawAdult {
  /// Column list matching [`RawAdult::from_row`].
  pub const COLUMNS: &'static str =
    "id, name, nic, gender, dob, address, occupation, contact, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      nic:        row.get(2)?,
      gender:     row.get(3)?,
      dob:        row.get(4)?,
      address:    row.get(5)?,
      occupation: row.get(6)?,
      contact:    row.get(7)?,
      created_at: row.get(8)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person::Adult(Adult {
      id:         Some(self.id),
      name:       self.name,
      nic:        self.nic,
      gender:     self.gender,
      dob:        decode_date(&self.dob)?,
      address:    self.address,
      occupation: self.occupation,
      contact:    self.contact,
      created_at: Some(decode_dt(&self.created_at)?),
    }))
  }
}

/// Raw values read directly from a `children` row.
pub struct RawChild {
  pub id:         i64,
  pub name:       String,
  pub gender:     String,
  pub dob:        String,
  pub parent_nic: String,
  pub school:     String,
  pub grade:      String,
  pub created_at: String,
}

impl RawChild {
  pub const COLUMNS: &'static str =
    "id, name, gender, dob, parent_nic, school, grade, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      gender:     row.get(2)?,
      dob:        row.get(3)?,
      parent_nic: row.get(4)?,
      school:     row.get(5)?,
      grade:      row.get(6)?,
      created_at: row.get(7)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person::Child(Child {
      id:         Some(self.id),
      name:       self.name,
      gender:     self.gender,
      dob:        decode_date(&self.dob)?,
      parent_nic: self.parent_nic,
      school:     self.school,
      grade:      self.grade,
      created_at: Some(decode_dt(&self.created_at)?),
    }))
  }
}

/// A raw row from either table.
pub enum RawPerson {
  Adult(RawAdult),
  Child(RawChild),
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    match self {
      Self::Adult(a) => a.into_person(),
      Self::Child(c) => c.into_person(),
    }
  }
}
