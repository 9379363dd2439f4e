//! Core types and the client-side record cache for the person registry.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::RecordStore`]; the
//! [`cache::RecordCache`] mirrors their two tables into one collection and
//! [`view`] projects it for display.

pub mod cache;
pub mod error;
pub mod person;
pub mod store;
pub mod summary;
pub mod view;

pub use cache::{LoadPolicy, LoadReport, RecordCache};
pub use error::{Error, Result, RowError};
pub use person::{Adult, Child, Person, PersonKey, PersonKind};
pub use store::RecordStore;
pub use summary::Summary;
pub use view::{SortKey, TypeFilter, ViewQuery};

#[cfg(test)]
mod testing;
