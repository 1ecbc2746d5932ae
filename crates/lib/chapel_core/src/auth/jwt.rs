//! JWT token generation and verification.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::config::AuthConfig;
use super::{AuthError, AuthRejection};
use crate::models::auth::TokenClaims;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Signing and verification keys for admin access tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm: config.algorithm,
            lifetime: Duration::try_minutes(config.token_lifetime_minutes).unwrap_or(Duration::MAX),
        }
    }

    /// Absolute token lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a token for `user_id`/`username`, valid from now.
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, username, Utc::now())
    }

    /// Sign a token as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::TokenError("token expiry is out of range".into()))?;
        let claims = TokenClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))?;
        Ok(IssuedToken { token, claims })
    }

    /// Check signature and expiry, returning the claims on success.
    ///
    /// Expiry is evaluated with zero leeway. Every decoding failure other than
    /// expiry is reported as [`AuthRejection::MalformedCredential`].
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthRejection> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthRejection::ExpiredCredential,
                _ => AuthRejection::MalformedCredential,
            })
    }
}
