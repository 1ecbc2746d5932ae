//! Authentication and authorization logic.
//!
//! Provides password hashing, JWT issuance and verification, the credential
//! store seam, and the bearer-token gate shared by every transport.

pub mod config;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod queries;
pub mod service;
pub mod store;

use thiserror::Error;

/// Why a presented credential was not accepted.
///
/// The variants are kept distinct for diagnostics; [`AuthRejection::reason`]
/// collapses them into the small set of codes returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("no bearer token presented")]
    MissingCredential,

    #[error("token could not be decoded or its signature is invalid")]
    MalformedCredential,

    #[error("token has expired")]
    ExpiredCredential,

    #[error("principal is disabled")]
    AccountDisabled,

    #[error("principal no longer exists")]
    UnknownPrincipal,
}

impl AuthRejection {
    /// Reason code exposed in 401 responses.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthRejection::MissingCredential => "no_token",
            AuthRejection::MalformedCredential | AuthRejection::ExpiredCredential => {
                "invalid_or_expired"
            }
            AuthRejection::AccountDisabled | AuthRejection::UnknownPrincipal => "account_disabled",
        }
    }

    /// Human-readable message paired with [`AuthRejection::reason`].
    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingCredential => "No authentication token provided",
            AuthRejection::MalformedCredential | AuthRejection::ExpiredCredential => {
                "Invalid or expired token"
            }
            AuthRejection::AccountDisabled | AuthRejection::UnknownPrincipal => {
                "Account is not available"
            }
        }
    }
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username, wrong password, or disabled account. Deliberately
    /// carries no detail.
    #[error("Invalid credentials")]
    CredentialError,

    #[error("Unauthenticated: {0}")]
    Rejected(#[from] AuthRejection),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The credential store could not be reached. Never reported as an
    /// authentication failure.
    #[error("Credential store unavailable: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Upstream(e.to_string())
    }
}
