//! Local inspection of access tokens.
//!
//! The client never holds the signing key, so only the expiry claim is read.
//! Whether the token is genuine is for the server to decide.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Expiry of a compact JWT, or `None` when the token cannot be read.
pub fn peek_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claim.exp, 0)
}

#[cfg(test)]
mod tests {
    use chapel_core::auth::config::AuthConfig;
    use chapel_core::auth::jwt::TokenKeys;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn reads_expiry_without_the_key() {
        let keys = TokenKeys::new(&AuthConfig::with_secret("server-only"));
        let issued = keys.issue(Uuid::new_v4(), "admin").unwrap();
        let exp = peek_expiry(&issued.token).unwrap();
        assert_eq!(exp.timestamp(), issued.claims.exp);
    }

    #[test]
    fn unreadable_tokens_have_no_expiry() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a.!!!.c", "a.e30.c"] {
            assert_eq!(peek_expiry(token), None, "token {token:?}");
        }
    }
}
