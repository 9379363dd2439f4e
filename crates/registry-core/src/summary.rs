//! Dashboard counts over the cache.

use serde::{Deserialize, Serialize};

use crate::person::Person;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
  pub adults:   usize,
  pub children: usize,
  pub total:    usize,
}

impl Summary {
  pub fn of(persons: &[Person]) -> Self {
    let adults = persons.iter().filter(|p| p.is_adult()).count();
    Self { adults, children: persons.len() - adults, total: persons.len() }
  }
}
