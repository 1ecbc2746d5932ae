//! # chapel_client
//!
//! Admin panel client: logs in against the Chapel API, keeps the session
//! alive only while it is fresh and in use, and holds the admin data fetched
//! under it.

pub mod client;
pub mod session;

use thiserror::Error;

pub use client::AdminClient;
pub use session::{LogoutReason, SessionConfig, SessionManager, SessionState};

/// Client errors. The `Display` text is what the admin UI shows.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Too many login attempts. Please try again later.")]
    RateLimited,

    #[error("Received token expires too soon")]
    TokenTooShortLived,

    #[error("Received token could not be read")]
    MalformedToken,

    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    /// The session changed while the request was in flight; its result was dropped.
    #[error("Session changed before the response arrived")]
    Discarded,

    #[error("Unable to connect to server")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
