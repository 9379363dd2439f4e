//! Person records: the two variants mirrored from the `adults` and
//! `children` tables.
//!
//! The variant is always explicit. A row's table decides which variant it
//! decodes into; nothing is inferred from which fields happen to be present.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Result, RowError};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Which table a person lives in.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PersonKind {
  Adult,
  Child,
}

impl PersonKind {
  pub const ALL: [PersonKind; 2] = [PersonKind::Adult, PersonKind::Child];

  /// Name of the backing table.
  pub fn table(self) -> &'static str {
    match self {
      Self::Adult => "adults",
      Self::Child => "children",
    }
  }

  pub fn from_table(table: &str) -> Option<Self> {
    match table {
      "adults" => Some(Self::Adult),
      "children" => Some(Self::Child),
      _ => None,
    }
  }
}

/// Identifiers are only unique within a table, so every lookup pairs the id
/// with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonKey {
  pub kind: PersonKind,
  pub id:   i64,
}

impl PersonKey {
  pub fn new(kind: PersonKind, id: i64) -> Self { Self { kind, id } }
}

impl fmt::Display for PersonKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.kind, self.id)
  }
}

// ─── Variants ────────────────────────────────────────────────────────────────

/// A row of the `adults` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adult {
  /// Server-assigned; `None` until persisted.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:         Option<i64>,
  pub name:       String,
  /// National identity code. Unique, and never changed after creation.
  pub nic:        String,
  pub gender:     String,
  pub dob:        NaiveDate,
  #[serde(default)]
  pub address:    String,
  #[serde(default)]
  pub occupation: String,
  #[serde(default)]
  pub contact:    String,
  /// Server-assigned at insert time.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}

/// A row of the `children` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:         Option<i64>,
  pub name:       String,
  pub gender:     String,
  pub dob:        NaiveDate,
  /// The parent's national identity code. Not an enforced reference.
  pub parent_nic: String,
  #[serde(default)]
  pub school:     String,
  #[serde(default)]
  pub grade:      String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// Either kind of record held in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "lowercase")]
pub enum Person {
  Adult(Adult),
  Child(Child),
}

impl From<Adult> for Person {
  fn from(a: Adult) -> Self { Self::Adult(a) }
}

impl From<Child> for Person {
  fn from(c: Child) -> Self { Self::Child(c) }
}

impl Person {
  pub fn kind(&self) -> PersonKind {
    match self {
      Self::Adult(_) => PersonKind::Adult,
      Self::Child(_) => PersonKind::Child,
    }
  }

  pub fn is_adult(&self) -> bool { matches!(self, Self::Adult(_)) }

  pub fn id(&self) -> Option<i64> {
    match self {
      Self::Adult(a) => a.id,
      Self::Child(c) => c.id,
    }
  }

  /// The composite key, once the record has been persisted.
  pub fn key(&self) -> Option<PersonKey> {
    self.id().map(|id| PersonKey::new(self.kind(), id))
  }

  /// The same record addressed to row `id`.
  pub fn with_id(mut self, id: i64) -> Self {
    match &mut self {
      Self::Adult(a) => a.id = Some(id),
      Self::Child(c) => c.id = Some(id),
    }
    self
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Adult(a) => &a.name,
      Self::Child(c) => &c.name,
    }
  }

  pub fn dob(&self) -> NaiveDate {
    match self {
      Self::Adult(a) => a.dob,
      Self::Child(c) => c.dob,
    }
  }

  pub fn created_at(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::Adult(a) => a.created_at,
      Self::Child(c) => c.created_at,
    }
  }

  /// Textual rendering of every present field, in column order.
  pub fn field_texts(&self) -> Vec<String> {
    let mut out = Vec::with_capacity(9);
    match self {
      Self::Adult(a) => {
        out.extend(a.id.map(|id| id.to_string()));
        out.extend([
          a.name.clone(),
          a.nic.clone(),
          a.gender.clone(),
          a.dob.to_string(),
          a.address.clone(),
          a.occupation.clone(),
          a.contact.clone(),
        ]);
        out.extend(a.created_at.map(|t| t.to_rfc3339()));
      }
      Self::Child(c) => {
        out.extend(c.id.map(|id| id.to_string()));
        out.extend([
          c.name.clone(),
          c.gender.clone(),
          c.dob.to_string(),
          c.parent_nic.clone(),
          c.school.clone(),
          c.grade.clone(),
        ]);
        out.extend(c.created_at.map(|t| t.to_rfc3339()));
      }
    }
    out
  }

  /// Check the fields a record cannot be stored without.
  pub fn validate(&self) -> Result<()> {
    let kind = self.kind();
    let required: Vec<(&'static str, &str)> = match self {
      Self::Adult(a) => vec![
        ("name", a.name.as_str()),
        ("nic", a.nic.as_str()),
        ("gender", a.gender.as_str()),
      ],
      Self::Child(c) => vec![
        ("name", c.name.as_str()),
        ("gender", c.gender.as_str()),
        ("parent_nic", c.parent_nic.as_str()),
      ],
    };
    match required.into_iter().find(|(_, v)| v.trim().is_empty()) {
      Some((field, _)) => Err(RowError::MissingField { kind, field }),
      None => Ok(()),
    }
  }

  /// Serialise as a flat table row, without the variant tag.
  pub fn to_row(&self) -> Result<serde_json::Value> {
    let row = match self {
      Self::Adult(a) => serde_json::to_value(a)?,
      Self::Child(c) => serde_json::to_value(c)?,
    };
    Ok(row)
  }

  /// Deserialise a flat row read from the table for `kind`.
  pub fn from_row(kind: PersonKind, row: serde_json::Value) -> Result<Self> {
    Ok(match kind {
      PersonKind::Adult => Self::Adult(serde_json::from_value(row)?),
      PersonKind::Child => Self::Child(serde_json::from_value(row)?),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{adult, child};

  #[test]
  fn kind_tracks_variant() {
    let a: Person = adult(Some(1), "Alice", "A1").into();
    let c: Person = child(Some(1), "Bob", "A1").into();
    assert!(a.is_adult());
    assert_eq!(a.kind(), PersonKind::Adult);
    assert!(!c.is_adult());
    assert_eq!(c.kind(), PersonKind::Child);
    assert_ne!(a.key(), c.key());
  }

  #[test]
  fn table_names() {
    for kind in PersonKind::ALL {
      assert_eq!(PersonKind::from_table(kind.table()), Some(kind));
    }
    assert_eq!(PersonKind::from_table("people"), None);
    assert_eq!("child".parse::<PersonKind>().unwrap(), PersonKind::Child);
  }

  #[test]
  fn row_omits_tag_and_unset_server_fields() {
    let p: Person = adult(None, "Alice", "A1").into();
    let row = p.to_row().unwrap();
    assert!(row.get("kind").is_none());
    assert!(row.get("id").is_none());
    assert!(row.get("created_at").is_none());
    assert_eq!(row["nic"], "A1");
    assert_eq!(row["dob"], "1990-04-12");
  }

  #[test]
  fn from_row_uses_table_kind() {
    let row = serde_json::json!({
      "id": 7,
      "name": "Bob",
      "gender": "Male",
      "dob": "2015-09-01",
      "parent_nic": "A1",
      "school": "Hillside",
      "grade": "3",
      "created_at": "2024-05-01T10:00:00Z",
    });
    let p = Person::from_row(PersonKind::Child, row).unwrap();
    assert_eq!(p.key(), Some(PersonKey::new(PersonKind::Child, 7)));
    assert!(p.created_at().is_some());
  }

  #[test]
  fn from_row_rejects_row_of_other_table() {
    let row = child(Some(1), "Bob", "A1");
    let row = serde_json::to_value(row).unwrap();
    assert!(Person::from_row(PersonKind::Adult, row).is_err());
  }

  #[test]
  fn field_texts_cover_variant_fields() {
    let p: Person = child(Some(12), "Bob", "A1").into();
    let texts = p.field_texts();
    assert!(texts.contains(&"12".to_string()));
    assert!(texts.contains(&"A1".to_string()));
    assert!(texts.contains(&"Hillside".to_string()));
    assert!(texts.contains(&"2015-09-01".to_string()));
  }

  #[test]
  fn validate_flags_blank_required_field() {
    let mut a = adult(None, "Alice", "A1");
    assert!(Person::from(a.clone()).validate().is_ok());

    a.nic = "  ".into();
    let err = Person::from(a).validate().unwrap_err();
    assert!(matches!(
      err,
      RowError::MissingField { kind: PersonKind::Adult, field: "nic" }
    ));

    let mut c = child(None, "Bob", "A1");
    c.parent_nic.clear();
    assert!(Person::from(c).validate().is_err());
  }
}
