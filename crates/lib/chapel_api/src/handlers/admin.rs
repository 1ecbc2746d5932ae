//! Gated content management handlers.
//!
//! One handler per verb serves every resource; the `{resource}` path segment
//! selects the collection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chapel_core::content::{self, ContentList, ContentRecord, Resource, queries};
use chapel_core::models::wire::MessageResponse;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedAdmin;

fn resource(segment: &str) -> AppResult<Resource> {
    segment.parse::<Resource>().map_err(AppError::from)
}

fn json_body(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<serde_json::Value> {
    body.map(|Json(v)| v)
        .map_err(|_| AppError::Validation("Invalid JSON body".into()))
}

/// `GET /api/admin/{resource}`: every record, newest first.
pub async fn list_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> AppResult<Json<ContentList>> {
    let resource = resource(&segment)?;
    Ok(Json(content::list(&state.pool, resource).await?))
}

/// `POST /api/admin/{resource}`: create a record.
pub async fn create_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(segment): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContentRecord>)> {
    let resource = resource(&segment)?;
    let record = content::create(&state.pool, resource, json_body(body)?).await?;
    info!(admin = %admin.0.username, %resource, "content created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/admin/{resource}/{id}`: update the fields present in the body.
pub async fn update_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path((segment, id)): Path<(String, Uuid)>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<Json<ContentRecord>> {
    let resource = resource(&segment)?;
    let record = content::update(&state.pool, resource, id, json_body(body)?).await?;
    info!(admin = %admin.0.username, %resource, %id, "content updated");
    Ok(Json(record))
}

/// `DELETE /api/admin/{resource}/{id}`.
pub async fn delete_handler(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path((segment, id)): Path<(String, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    let resource = resource(&segment)?;
    content::delete(&state.pool, resource, id).await?;
    info!(admin = %admin.0.username, %resource, %id, "content deleted");
    Ok(Json(MessageResponse {
        message: format!("Deleted {resource} {id}"),
    }))
}

/// `PATCH /api/admin/contact-forms/{id}/read`.
pub async fn mark_read_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    queries::mark_contact_form_read(&state.pool, id).await?;
    Ok(Json(MessageResponse {
        message: "Message marked as read".into(),
    }))
}
