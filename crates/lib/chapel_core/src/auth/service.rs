//! Login and token verification against the credential store.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::jwt::{IssuedToken, TokenKeys};
use super::password::{verify_dummy, verify_password};
use super::store::CredentialStore;
use super::{AuthError, AuthRejection};
use crate::models::auth::AdminUser;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: AdminUser,
}

/// Issues tokens on login and turns presented tokens back into live principals.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    keys: TokenKeys,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, keys: TokenKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    /// Authenticate with username + password.
    ///
    /// Unknown username, wrong password and disabled account all yield
    /// [`AuthError::CredentialError`]. Store failures yield
    /// [`AuthError::Upstream`].
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::ValidationError(
                "Username and password are required".into(),
            ));
        }

        let user = match self.store.find_by_username(username).await? {
            Some(user) => user,
            None => {
                verify_dummy(password);
                debug!(username, "login refused: unknown username");
                return Err(AuthError::CredentialError);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            debug!(username, "login refused: wrong password");
            return Err(AuthError::CredentialError);
        }

        if !user.is_active {
            debug!(username, "login refused: account disabled");
            return Err(AuthError::CredentialError);
        }

        self.store.touch_last_login(user.id).await?;
        let token = self.keys.issue(user.id, &user.username)?;
        info!(username = %user.username, "admin logged in");

        Ok(LoginOutcome { token, user })
    }

    /// Verify a bearer token and return the current principal record.
    ///
    /// The principal is re-read on every call, so deactivation takes effect
    /// on the next request carrying an older token.
    pub async fn verify(&self, token: &str) -> Result<AdminUser, AuthError> {
        let claims = self.keys.decode(token).map_err(|rejection| {
            debug!(%rejection, "token rejected");
            rejection
        })?;

        let rejection = match self.store.find_by_username(&claims.username).await? {
            Some(user) if user.id.to_string() != claims.sub => AuthRejection::UnknownPrincipal,
            Some(user) if !user.is_active => AuthRejection::AccountDisabled,
            Some(user) => return Ok(user),
            None => AuthRejection::UnknownPrincipal,
        };
        debug!(username = %claims.username, %rejection, "token rejected");
        Err(rejection.into())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::auth::config::AuthConfig;
    use crate::auth::store::MemoryCredentialStore;

    fn setup() -> (Arc<MemoryCredentialStore>, Authenticator) {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .add_admin("admin", "admin@example.org", "correct")
            .unwrap();
        let keys = TokenKeys::new(&AuthConfig::with_secret("service-test-secret"));
        let auth = Authenticator::new(store.clone(), keys);
        (store, auth)
    }

    /// Store whose every call fails, as if the database were unreachable.
    struct DownStore;

    #[async_trait]
    impl CredentialStore for DownStore {
        async fn find_by_username(&self, _: &str) -> Result<Option<AdminUser>, AuthError> {
            Err(AuthError::Upstream("connection refused".into()))
        }

        async fn touch_last_login(&self, _: Uuid) -> Result<(), AuthError> {
            Err(AuthError::Upstream("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn login_issues_token_with_configured_lifetime() {
        let (_, auth) = setup();
        let outcome = auth.login("admin", "correct").await.unwrap();
        let claims = &outcome.token.claims;
        assert_eq!(claims.exp, claims.iat + 1440 * 60);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.sub, outcome.user.id.to_string());
    }

    #[tokio::test]
    async fn login_updates_last_login() {
        let (store, auth) = setup();
        assert!(store.get("admin").unwrap().last_login.is_none());
        auth.login("admin", "correct").await.unwrap();
        assert!(store.get("admin").unwrap().last_login.is_some());
    }

    #[tokio::test]
    async fn failed_login_leaves_last_login_untouched() {
        let (store, auth) = setup();
        let _ = auth.login("admin", "wrongpass").await;
        assert!(store.get("admin").unwrap().last_login.is_none());
    }

    #[tokio::test]
    async fn wrong_password_unknown_user_and_disabled_look_the_same() {
        let (store, auth) = setup();
        let wrong = auth.login("admin", "wrongpass").await.unwrap_err();
        let unknown = auth.login("nobody", "correct").await.unwrap_err();
        store.set_active("admin", false);
        let disabled = auth.login("admin", "correct").await.unwrap_err();

        for err in [&wrong, &unknown, &disabled] {
            assert!(matches!(err, AuthError::CredentialError));
            assert_eq!(err.to_string(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn unknown_username_costs_a_password_check() {
        let (_, auth) = setup();
        // First call pays for building the placeholder hash.
        let _ = auth.login("nobody", "correct").await;

        let started = Instant::now();
        let _ = auth.login("admin", "wrongpass").await;
        let wrong_password = started.elapsed();

        let started = Instant::now();
        let _ = auth.login("nobody", "wrongpass").await;
        let unknown = started.elapsed();

        assert!(
            unknown * 4 >= wrong_password,
            "unknown={unknown:?} wrong_password={wrong_password:?}"
        );
    }

    #[tokio::test]
    async fn blank_fields_are_validation_errors() {
        let (_, auth) = setup();
        assert!(matches!(
            auth.login("", "correct").await.unwrap_err(),
            AuthError::ValidationError(_)
        ));
        assert!(matches!(
            auth.login("admin", "").await.unwrap_err(),
            AuthError::ValidationError(_)
        ));
    }

    #[tokio::test]
    async fn issue_then_verify_returns_same_principal() {
        let (_, auth) = setup();
        let outcome = auth.login("admin", "correct").await.unwrap();
        let user = auth.verify(&outcome.token.token).await.unwrap();
        assert_eq!(user.id, outcome.user.id);
        assert_eq!(user.username, "admin");
    }

    #[tokio::test]
    async fn verify_returns_live_record() {
        let (store, auth) = setup();
        let outcome = auth.login("admin", "correct").await.unwrap();
        let mut changed = store.get("admin").unwrap();
        changed.email = "new@example.org".into();
        store.insert(changed);
        let user = auth.verify(&outcome.token.token).await.unwrap();
        assert_eq!(user.email, "new@example.org");
    }

    #[tokio::test]
    async fn deactivation_rejects_outstanding_tokens() {
        let (store, auth) = setup();
        let outcome = auth.login("admin", "correct").await.unwrap();
        assert!(auth.verify(&outcome.token.token).await.is_ok());

        store.set_active("admin", false);
        let err = auth.verify(&outcome.token.token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Rejected(AuthRejection::AccountDisabled)
        ));

        store.set_active("admin", true);
        assert!(auth.verify(&outcome.token.token).await.is_ok());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (store, auth) = setup();
        let user = store.get("admin").unwrap();
        let issued_at = Utc::now() - auth.keys().lifetime() - Duration::hours(1);
        let expired = auth
            .keys()
            .issue_at(user.id, &user.username, issued_at)
            .unwrap();
        let err = auth.verify(&expired.token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Rejected(AuthRejection::ExpiredCredential)
        ));
    }

    #[tokio::test]
    async fn token_for_missing_principal_is_unknown() {
        let (_, auth) = setup();
        let token = auth.keys().issue(Uuid::new_v4(), "ghost").unwrap();
        let err = auth.verify(&token.token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Rejected(AuthRejection::UnknownPrincipal)
        ));
    }

    #[tokio::test]
    async fn token_for_recreated_username_is_unknown() {
        let (_, auth) = setup();
        let token = auth.keys().issue(Uuid::new_v4(), "admin").unwrap();
        let err = auth.verify(&token.token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::Rejected(AuthRejection::UnknownPrincipal)
        ));
    }

    #[tokio::test]
    async fn store_outage_is_upstream_on_login_and_verify() {
        let keys = TokenKeys::new(&AuthConfig::with_secret("service-test-secret"));
        let auth = Authenticator::new(Arc::new(DownStore), keys);

        let err = auth.login("admin", "correct").await.unwrap_err();
        assert!(matches!(err, AuthError::Upstream(_)));

        let token = auth.keys().issue(Uuid::new_v4(), "admin").unwrap();
        let err = auth.verify(&token.token).await.unwrap_err();
        assert!(matches!(err, AuthError::Upstream(_)));
    }
}
