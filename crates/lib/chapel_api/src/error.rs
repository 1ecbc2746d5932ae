//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chapel_core::auth::AuthError;
use chapel_core::content::ContentError;
use chapel_core::models::wire::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// 401 with a fixed reason code such as `no_token` or `invalid_credentials`.
    #[error("Unauthorized ({reason}): {message}")]
    Unauthorized {
        reason: &'static str,
        message: &'static str,
    },

    #[error("Database unavailable: {0}")]
    DbUnavailable(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error", m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m.as_str()),
            AppError::MethodNotAllowed(m) => {
                (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", m.as_str())
            }
            AppError::Unauthorized { reason, message } => {
                (StatusCode::UNAUTHORIZED, *reason, *message)
            }
            AppError::DbUnavailable(detail) => {
                error!(%detail, "database unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "db_unavailable",
                    "Service temporarily unavailable",
                )
            }
            AppError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::DbUnavailable(e.to_string())
            }
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::CredentialError => AppError::Unauthorized {
                reason: "invalid_credentials",
                message: "Invalid credentials",
            },
            AuthError::Rejected(rejection) => AppError::Unauthorized {
                reason: rejection.reason(),
                message: rejection.message(),
            },
            AuthError::ValidationError(msg) => AppError::Validation(msg),
            AuthError::Upstream(msg) => AppError::DbUnavailable(msg),
            AuthError::TokenError(msg) | AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<ContentError> for AppError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::Validation(msg) => AppError::Validation(msg),
            ContentError::NotFound(msg) => AppError::NotFound(msg),
            ContentError::Unsupported(msg) => AppError::MethodNotAllowed(msg),
            ContentError::DbError(e) => AppError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use chapel_core::auth::AuthRejection;

    use super::*;

    #[test]
    fn credential_error_maps_to_generic_401() {
        let err = AppError::from(AuthError::CredentialError);
        assert!(matches!(
            err,
            AppError::Unauthorized {
                reason: "invalid_credentials",
                message: "Invalid credentials"
            }
        ));
    }

    #[test]
    fn rejections_keep_their_reason_code() {
        let err = AppError::from(AuthError::Rejected(AuthRejection::ExpiredCredential));
        assert!(matches!(
            err,
            AppError::Unauthorized {
                reason: "invalid_or_expired",
                ..
            }
        ));
    }

    #[test]
    fn upstream_is_never_unauthorized() {
        let err = AppError::from(AuthError::Upstream("down".into()));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn internal_details_stay_out_of_the_response() {
        let resp = AppError::Internal("secret detail".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
