//! Entity handlers shared by every resource: list, find, read, update, delete.

use crate::db::{Criterion, Crud, Entity};
use crate::error::AppError;
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Query string pairs as an equality criterion. Values stay strings.
fn criterion_from_query(params: HashMap<String, String>) -> Criterion {
    params.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

fn not_found<T: Entity>(what: &str) -> AppError {
    AppError::NotFound(format!("{} {}", T::NAME, what))
}

pub async fn list<T: Entity + Serialize>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let mut session = state.sessions.session();
    let rows = T::find_all(&criterion_from_query(params), &mut session).await?;
    Ok(response::many(rows))
}

/// Exactly one match or 404; several matches also answer 404. No filters
/// matches every row, so this only succeeds on a single-row table.
pub async fn find<T: Entity + Serialize>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let criterion = criterion_from_query(params);
    let mut session = state.sessions.session();
    let row = T::find_one(&criterion, &mut session)
        .await?
        .ok_or_else(|| not_found::<T>(&criterion.to_string()))?;
    Ok(response::ok(row))
}

pub async fn read<T: Entity + Serialize>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut session = state.sessions.session();
    let row = T::get(&id, &mut session)
        .await?
        .ok_or_else(|| not_found::<T>(&id))?;
    Ok(response::ok(row))
}

pub async fn update<T: Entity + Serialize>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let Value::Object(changes) = body else {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    };
    let mut session = state.sessions.session();
    let mut row = T::get(&id, &mut session)
        .await?
        .ok_or_else(|| not_found::<T>(&id))?;
    row.update(&changes, &mut session).await?;
    Ok(response::ok(row))
}

pub async fn delete<T: Entity + Serialize>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut session = state.sessions.session();
    let row = T::get(&id, &mut session)
        .await?
        .ok_or_else(|| not_found::<T>(&id))?;
    row.delete(&mut session).await?;
    session.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
