//! Token signing configuration.

use jsonwebtoken::Algorithm;
use tracing::warn;

use super::AuthError;

/// Signing key used when no secret is configured. Only fit for development.
pub const DEV_FALLBACK_SECRET: &str = "chapel-dev-secret-change-in-production";

/// Default access token lifetime: 24 hours.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 1440;

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_LIFETIME_MINUTES: i64 = 365 * 24 * 60;

/// Token issuer/verifier settings.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HMAC signing secret.
    pub jwt_secret: String,
    /// Signing algorithm (HMAC family only).
    pub algorithm: Algorithm,
    /// Absolute token lifetime, counted from issuance.
    pub token_lifetime_minutes: i64,
}

impl AuthConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                          | Default                 |
    /// |-----------------------------------|-------------------------|
    /// | `JWT_SECRET_KEY` / `JWT_SECRET`   | development key + warning |
    /// | `JWT_ALGORITHM`                   | `HS256`                 |
    /// | `JWT_ACCESS_TOKEN_EXPIRE_MINUTES` | `1440`                  |
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AuthConfig::from_env`] but reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let jwt_secret = resolve_jwt_secret(&lookup);

        let algorithm = match lookup("JWT_ALGORITHM").filter(|v| !v.trim().is_empty()) {
            Some(name) => parse_algorithm(name.trim())?,
            None => Algorithm::HS256,
        };

        let token_lifetime_minutes = match lookup("JWT_ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                AuthError::ValidationError(format!(
                    "JWT_ACCESS_TOKEN_EXPIRE_MINUTES must be an integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_TOKEN_LIFETIME_MINUTES,
        };
        if token_lifetime_minutes <= 0 {
            return Err(AuthError::ValidationError(
                "JWT_ACCESS_TOKEN_EXPIRE_MINUTES must be positive".into(),
            ));
        }
        if token_lifetime_minutes > MAX_TOKEN_LIFETIME_MINUTES {
            return Err(AuthError::ValidationError(format!(
                "JWT_ACCESS_TOKEN_EXPIRE_MINUTES must not exceed {MAX_TOKEN_LIFETIME_MINUTES}"
            )));
        }

        Ok(Self {
            jwt_secret,
            algorithm,
            token_lifetime_minutes,
        })
    }

    /// Config with an explicit secret and defaults for everything else.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            algorithm: Algorithm::HS256,
            token_lifetime_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
        }
    }

    /// Whether the development fallback key is in use.
    pub fn uses_fallback_secret(&self) -> bool {
        self.jwt_secret == DEV_FALLBACK_SECRET
    }
}

/// Resolve the signing secret: `JWT_SECRET_KEY` → `JWT_SECRET` → fallback key.
fn resolve_jwt_secret(lookup: &impl Fn(&str) -> Option<String>) -> String {
    for key in ["JWT_SECRET_KEY", "JWT_SECRET"] {
        if let Some(secret) = lookup(key)
            && !secret.is_empty()
        {
            return secret;
        }
    }
    warn!("JWT_SECRET_KEY is not set; signing tokens with the development fallback key");
    DEV_FALLBACK_SECRET.to_string()
}

fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AuthError::ValidationError(format!(
            "unsupported JWT_ALGORITHM '{other}' (expected HS256, HS384 or HS512)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_fallback_secret() {
        let cfg = AuthConfig::from_lookup(lookup(&[])).unwrap();
        assert!(cfg.uses_fallback_secret());
        assert_eq!(cfg.algorithm, Algorithm::HS256);
        assert_eq!(cfg.token_lifetime_minutes, 1440);
    }

    #[test]
    fn reads_all_variables() {
        let cfg = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", "s3cret"),
            ("JWT_ALGORITHM", "hs512"),
            ("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", "60"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.algorithm, Algorithm::HS512);
        assert_eq!(cfg.token_lifetime_minutes, 60);
        assert!(!cfg.uses_fallback_secret());
    }

    #[test]
    fn empty_primary_secret_falls_through_to_secondary() {
        let cfg = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET_KEY", ""),
            ("JWT_SECRET", "other"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt_secret, "other");
    }

    #[test]
    fn rejects_asymmetric_algorithms() {
        let err = AuthConfig::from_lookup(lookup(&[("JWT_ALGORITHM", "RS256")])).unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));
    }

    #[test]
    fn rejects_non_positive_lifetime() {
        let err =
            AuthConfig::from_lookup(lookup(&[("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", "0")])).unwrap_err();
        assert!(matches!(err, AuthError::ValidationError(_)));
    }

    #[test]
    fn rejects_lifetime_beyond_one_year() {
        for raw in ["525601", "1000000000000", "9223372036854775807"] {
            let err = AuthConfig::from_lookup(lookup(&[("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", raw)]))
                .unwrap_err();
            assert!(matches!(err, AuthError::ValidationError(_)), "{raw}");
        }
        let cfg =
            AuthConfig::from_lookup(lookup(&[("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", "525600")])).unwrap();
        assert_eq!(cfg.token_lifetime_minutes, MAX_TOKEN_LIFETIME_MINUTES);
    }
}
