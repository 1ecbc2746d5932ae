//! Authorization gate shared by every transport.
//!
//! Transports hand over the raw `Authorization` header value; the gate
//! extracts the bearer token and asks the [`Authenticator`] for the principal.

use super::service::Authenticator;
use super::{AuthError, AuthRejection};
use crate::models::auth::AdminUser;

const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// A missing header, any other scheme, or an empty token is
/// [`AuthRejection::MissingCredential`]: nothing was presented that could be
/// checked.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthRejection> {
    let header = header.ok_or(AuthRejection::MissingCredential)?;
    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthRejection::MissingCredential)?;
    if scheme != BEARER_SCHEME || token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthRejection::MissingCredential);
    }
    Ok(token)
}

/// Resolve the principal behind an `Authorization` header.
///
/// The verifier is not consulted when no bearer token is present.
pub async fn authorize(auth: &Authenticator, header: Option<&str>) -> Result<AdminUser, AuthError> {
    let token = bearer_token(header)?;
    auth.verify(token).await
}
