//! Admin login and identity handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use chapel_core::models::auth::AdminProfile;
use chapel_core::models::wire::{LoginRequest, TokenResponse};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::services::auth;

/// `POST /api/admin/login`: authenticate with username + password. Not gated.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(body) = body.map_err(|_| AppError::Validation("Invalid JSON body".into()))?;
    let resp = auth::login(&state.auth, &body).await?;
    Ok(Json(resp))
}

/// `GET /api/admin/me`: the principal behind the presented token.
pub async fn me_handler(Extension(admin): Extension<AuthenticatedAdmin>) -> Json<AdminProfile> {
    Json(admin.0.profile())
}
