//! Create handlers: each resource accepts its base schema.

use crate::db::Crud;
use crate::error::AppError;
use crate::models::{Host, HostBaseSchema, HostGroup, HostGroupBaseSchema};
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

pub async fn create_host(
    State(state): State<AppState>,
    payload: Result<Json<HostBaseSchema>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    body.validate()?;
    let mut session = state.sessions.session();
    let mut host = Host::from(body);
    host.save(&mut session).await?;
    Ok(response::created(host))
}

pub async fn create_host_group(
    State(state): State<AppState>,
    payload: Result<Json<HostGroupBaseSchema>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    body.validate()?;
    let mut session = state.sessions.session();
    let mut group = HostGroup::from(body);
    group.save(&mut session).await?;
    Ok(response::created(group))
}
