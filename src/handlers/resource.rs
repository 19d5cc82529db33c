//! Resource CRUD handlers: list, read, create, update, delete.
//! `ResourcePath` runs first, so an unknown kind is a 404 before any body is read.

use crate::error::AppError;
use crate::extractors::{RecordBody, ResourcePath};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub async fn list(
    State(state): State<AppState>,
    path: ResourcePath,
) -> Result<impl IntoResponse, AppError> {
    let rows = CrudService::list(state.store.as_ref(), path.kind).await?;
    Ok((StatusCode::OK, Json(rows)))
}

pub async fn read(
    State(state): State<AppState>,
    path: ResourcePath,
) -> Result<impl IntoResponse, AppError> {
    let row = CrudService::read(state.store.as_ref(), path.kind, path.id()).await?;
    Ok((StatusCode::OK, Json(row)))
}

pub async fn create(
    State(state): State<AppState>,
    path: ResourcePath,
    RecordBody(body): RecordBody,
) -> Result<impl IntoResponse, AppError> {
    let row = CrudService::create(state.store.as_ref(), path.kind, body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    State(state): State<AppState>,
    path: ResourcePath,
    RecordBody(body): RecordBody,
) -> Result<impl IntoResponse, AppError> {
    let row = CrudService::update(state.store.as_ref(), path.kind, path.id(), body).await?;
    Ok((StatusCode::OK, Json(row)))
}

pub async fn delete(
    State(state): State<AppState>,
    path: ResourcePath,
) -> Result<impl IntoResponse, AppError> {
    CrudService::delete(state.store.as_ref(), path.kind, path.id()).await?;
    Ok((StatusCode::OK, format!("{} deleted", path.kind.label())))
}
