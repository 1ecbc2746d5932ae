//! Password hashing via bcrypt.

use std::sync::LazyLock;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 12;

/// Minimum accepted length for a new admin password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password with bcrypt (cost 12).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// Cost-12 hash of a throwaway secret, computed once.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("chapel-unknown-principal").ok());

/// Spend one bcrypt verification with nothing to compare against.
///
/// Called when no stored hash exists, so a missing username costs the same
/// as a wrong password.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = bcrypt::verify(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn dummy_hash_has_the_login_cost() {
        let hash = DUMMY_HASH.as_deref().unwrap();
        assert!(hash.starts_with("$2b$12$"));
        assert!(!verify_password("anything", hash).unwrap());
    }

    #[test]
    fn invalid_hash_is_an_internal_error() {
        let err = verify_password("pw", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
