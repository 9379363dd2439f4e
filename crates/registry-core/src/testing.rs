//! In-memory [`RecordStore`] with failure injection, plus record builders.

use std::{collections::HashSet, sync::Mutex};

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use thiserror::Error;

use crate::{
  person::{Adult, Child, Person, PersonKey, PersonKind},
  store::RecordStore,
};

pub fn adult(id: Option<i64>, name: &str, nic: &str) -> Adult {
  Adult {
    id,
    name: name.into(),
    nic: nic.into(),
    gender: "Female".into(),
    dob: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
    address: "12 Lake Road".into(),
    occupation: "Engineer".into(),
    contact: "0771234567".into(),
    created_at: None,
  }
}

pub fn child(id: Option<i64>, name: &str, parent_nic: &str) -> Child {
  Child {
    id,
    name: name.into(),
    gender: "Male".into(),
    dob: NaiveDate::from_ymd_opt(2015, 9, 1).unwrap(),
    parent_nic: parent_nic.into(),
    school: "Hillside".into(),
    grade: "3".into(),
    created_at: None,
  }
}

pub fn at(seconds: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::seconds(seconds)
}

#[derive(Debug, Error)]
#[error("fake store failure: {0}")]
pub struct FakeError(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
  Select(PersonKind),
  Insert,
  Update,
  Delete,
}

#[derive(Default)]
struct Tables {
  adults:   Vec<Adult>,
  children: Vec<Child>,
  next_ids: [i64; 2],
  clock:    i64,
  failing:  HashSet<Op>,
  /// Operations whose returned rows come back as the other variant.
  swapped:  HashSet<Op>,
  calls:    usize,
}

impl Tables {
  fn stamp(&mut self, kind: PersonKind) -> (i64, DateTime<Utc>) {
    let slot = match kind {
      PersonKind::Adult => 0,
      PersonKind::Child => 1,
    };
    self.next_ids[slot] += 1;
    self.clock += 1;
    (self.next_ids[slot], at(self.clock))
  }
}

/// Two independent id sequences, like two real tables.
#[derive(Default)]
pub struct MemoryStore {
  tables: Mutex<Tables>,
}

impl MemoryStore {
  pub fn fail(&self, op: Op) { self.tables.lock().unwrap().failing.insert(op); }

  pub fn recover(&self, op: Op) { self.tables.lock().unwrap().failing.remove(&op); }

  /// Make `op` still take effect but answer with rows of the wrong variant.
  pub fn swap_variant(&self, op: Op) { self.tables.lock().unwrap().swapped.insert(op); }

  /// Number of store calls made so far.
  pub fn calls(&self) -> usize { self.tables.lock().unwrap().calls }

  /// Seed a row directly, bypassing id assignment.
  pub fn seed(&self, person: impl Into<Person>) {
    let mut t = self.tables.lock().unwrap();
    match person.into() {
      Person::Adult(a) => {
        t.next_ids[0] = t.next_ids[0].max(a.id.unwrap_or(0));
        t.adults.push(a);
      }
      Person::Child(c) => {
        t.next_ids[1] = t.next_ids[1].max(c.id.unwrap_or(0));
        t.children.push(c);
      }
    }
  }

  fn answer(&self, op: Op, rows: Vec<Person>) -> Vec<Person> {
    if self.tables.lock().unwrap().swapped.contains(&op) {
      rows.into_iter().map(other_variant).collect()
    } else {
      rows
    }
  }

  fn enter(&self, op: Op) -> Result<std::sync::MutexGuard<'_, Tables>, FakeError> {
    let mut t = self.tables.lock().unwrap();
    t.calls += 1;
    if t.failing.contains(&op) {
      return Err(FakeError("injected"));
    }
    Ok(t)
  }
}

impl RecordStore for MemoryStore {
  type Error = FakeError;

  async fn select(&self, kind: PersonKind) -> Result<Vec<Person>, FakeError> {
    let rows = {
      let t = self.enter(Op::Select(kind))?;
      match kind {
        PersonKind::Adult => t.adults.iter().cloned().map(Person::from).collect(),
        PersonKind::Child => t.children.iter().cloned().map(Person::from).collect(),
      }
    };
    Ok(self.answer(Op::Select(kind), rows))
  }

  async fn insert(&self, person: &Person) -> Result<Vec<Person>, FakeError> {
    let stored = self.insert_row(person)?;
    Ok(self.answer(Op::Insert, vec![stored]))
  }

  async fn update(&self, person: &Person) -> Result<Vec<Person>, FakeError> {
    let updated = self.update_row(person)?;
    Ok(self.answer(Op::Update, updated.into_iter().collect()))
  }

  async fn delete(&self, key: PersonKey) -> Result<(), FakeError> {
    let mut t = self.enter(Op::Delete)?;
    match key.kind {
      PersonKind::Adult => t.adults.retain(|a| a.id != Some(key.id)),
      PersonKind::Child => t.children.retain(|c| c.id != Some(key.id)),
    }
    Ok(())
  }
}

impl MemoryStore {
  fn insert_row(&self, person: &Person) -> Result<Person, FakeError> {
    let mut t = self.enter(Op::Insert)?;
    let (id, created_at) = t.stamp(person.kind());
    let stored = match person.clone() {
      Person::Adult(mut a) => {
        if t.adults.iter().any(|x| x.nic == a.nic) {
          return Err(FakeError("duplicate nic"));
        }
        a.id = Some(id);
        a.created_at = Some(created_at);
        t.adults.push(a.clone());
        Person::Adult(a)
      }
      Person::Child(mut c) => {
        c.id = Some(id);
        c.created_at = Some(created_at);
        t.children.push(c.clone());
        Person::Child(c)
      }
    };
    Ok(stored)
  }

  fn update_row(&self, person: &Person) -> Result<Option<Person>, FakeError> {
    let mut t = self.enter(Op::Update)?;
    let updated = match person {
      Person::Adult(a) => t.adults.iter_mut().find(|x| x.id == a.id).map(|row| {
        *row = Adult { nic: row.nic.clone(), created_at: row.created_at, ..a.clone() };
        Person::Adult(row.clone())
      }),
      Person::Child(c) => t.children.iter_mut().find(|x| x.id == c.id).map(|row| {
        *row = Child { created_at: row.created_at, ..c.clone() };
        Person::Child(row.clone())
      }),
    };
    Ok(updated)
  }
}

/// The same person re-encoded as the other variant, keeping id and name.
fn other_variant(person: Person) -> Person {
  match person {
    Person::Adult(a) => Person::Child(Child {
      id:         a.id,
      name:       a.name,
      gender:     a.gender,
      dob:        a.dob,
      parent_nic: a.nic,
      school:     String::new(),
      grade:      String::new(),
      created_at: a.created_at,
    }),
    Person::Child(c) => Person::Adult(Adult {
      id:         c.id,
      name:       c.name,
      nic:        c.parent_nic,
      gender:     c.gender,
      dob:        c.dob,
      address:    String::new(),
      occupation: String::new(),
      contact:    String::new(),
      created_at: c.created_at,
    }),
  }
}
