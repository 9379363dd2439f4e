//! The derived view: a filtered, searched and sorted projection of the
//! cache. Never stored; recomputed from its inputs on every call.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::person::Person;

/// Restrict the view to one kind of record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TypeFilter {
  #[default]
  All,
  Adult,
  Child,
}

impl TypeFilter {
  pub fn matches(self, person: &Person) -> bool {
    match self {
      Self::All => true,
      Self::Adult => person.is_adult(),
      Self::Child => !person.is_adult(),
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
  /// Ascending by display name.
  Name,
  /// Most recently created first.
  #[default]
  Date,
}

/// Inputs to [`view`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
  #[serde(default)]
  pub filter: TypeFilter,
  /// Case-insensitive substring matched against every field. Empty matches
  /// everything.
  #[serde(default)]
  pub search: String,
  #[serde(default)]
  pub sort:   SortKey,
}

/// Order names case-insensitively. Names differing only in case put the
/// lowercase spelling first, so "amy" sorts before "Amy".
pub fn compare_names(a: &str, b: &str) -> Ordering {
  a.to_lowercase()
    .cmp(&b.to_lowercase())
    .then_with(|| b.cmp(a))
}

/// Whether any field of `person` contains `needle`, which must already be
/// lowercased.
pub fn matches_search(person: &Person, needle: &str) -> bool {
  person
    .field_texts()
    .iter()
    .any(|text| text.to_lowercase().contains(needle))
}

/// Project `persons` through `query`. Pure; the input is not reordered.
pub fn view<'a>(persons: &'a [Person], query: &ViewQuery) -> Vec<&'a Person> {
  let needle = query.search.to_lowercase();

  let mut out: Vec<&Person> = persons
    .iter()
    .filter(|p| query.filter.matches(p))
    .filter(|p| needle.is_empty() || matches_search(p, &needle))
    .collect();

  // `sort_by` is stable: ties keep snapshot order.
  match query.sort {
    SortKey::Name => out.sort_by(|a, b| compare_names(a.name(), b.name())),
    SortKey::Date => out.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
  }
  out
}
