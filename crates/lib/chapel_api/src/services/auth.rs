//! Authentication service: login flow delegating to `chapel_core::auth`.

use chapel_core::auth::service::Authenticator;
use chapel_core::models::wire::{LoginRequest, TokenResponse};

use crate::error::{AppError, AppResult};

/// Token type reported to clients.
pub const TOKEN_TYPE: &str = "bearer";

/// Authenticate with username + password and build the token response.
pub async fn login(auth: &Authenticator, request: &LoginRequest) -> AppResult<TokenResponse> {
    let (Some(username), Some(password)) = (
        request.username.as_deref().filter(|u| !u.trim().is_empty()),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    };

    let outcome = auth.login(username, password).await?;

    Ok(TokenResponse {
        access_token: outcome.token.token,
        token_type: TOKEN_TYPE.to_string(),
        user: outcome.user.profile(),
    })
}
