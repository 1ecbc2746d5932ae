//! Authorization gate middleware: bearer token extraction and verification.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chapel_core::auth::gate;
use chapel_core::models::auth::AdminUser;

use crate::AppState;
use crate::error::AppError;

/// The verified principal, stored in request extensions for admin handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub AdminUser);

/// Axum middleware: resolves `Authorization: Bearer <token>` to a live admin
/// and injects [`AuthenticatedAdmin`] into request extensions.
///
/// A header that is not valid UTF-8 counts as absent.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = gate::authorize(&state.auth, header).await?;

    request.extensions_mut().insert(AuthenticatedAdmin(user));

    Ok(next.run(request).await)
}
