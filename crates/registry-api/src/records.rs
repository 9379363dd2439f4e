//! Handlers for the table endpoints.
//!
//! | Method   | Path             | Notes |
//! |----------|------------------|-------|
//! | `GET`    | `/{table}`       | Every row of `adults` or `children` |
//! | `POST`   | `/{table}`       | Body: one row; returns 201 + the stored rows |
//! | `PATCH`  | `/{table}/{id}`  | Body: full row; returns the updated rows, empty if no match |
//! | `DELETE` | `/{table}/{id}`  | 204, also when the row does not exist |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use registry_core::{Person, PersonKey, PersonKind, RecordStore};
use serde_json::Value;

use crate::error::ApiError;

fn parse_table(table: &str) -> Result<PersonKind, ApiError> {
  PersonKind::from_table(table).ok_or_else(|| ApiError::NotFound(format!("table {table:?}")))
}

fn parse_body(kind: PersonKind, body: Value) -> Result<Person, ApiError> {
  Person::from_row(kind, body)
    .map_err(|e| ApiError::BadRequest(format!("invalid {kind} row: {e}")))
}

fn to_rows(persons: &[Person]) -> Result<Vec<Value>, ApiError> {
  Ok(persons.iter().map(Person::to_row).collect::<Result<_, _>>()?)
}

fn store_error<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /{table}`
pub async fn list<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(table): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
  let kind = parse_table(&table)?;
  let rows = store.select(kind).await.map_err(store_error)?;
  Ok(Json(to_rows(&rows)?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /{table}`: returns 201 + the stored rows.
pub async fn create<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(table): Path<String>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
  let kind = parse_table(&table)?;
  let person = parse_body(kind, body)?;
  let rows = store.insert(&person).await.map_err(store_error)?;
  Ok((StatusCode::CREATED, Json(to_rows(&rows)?)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /{table}/{id}`: the path id wins over any id in the body.
pub async fn update_one<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path((table, id)): Path<(String, i64)>,
  Json(body): Json<Value>,
) -> Result<Json<Vec<Value>>, ApiError> {
  let kind = parse_table(&table)?;
  let person = parse_body(kind, body)?.with_id(id);
  let rows = store.update(&person).await.map_err(store_error)?;
  Ok(Json(to_rows(&rows)?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /{table}/{id}`
pub async fn delete_one<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path((table, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
  let kind = parse_table(&table)?;
  store
    .delete(PersonKey::new(kind, id))
    .await
    .map_err(store_error)?;
  Ok(StatusCode::NO_CONTENT)
}
