//! Credential store seam.
//!
//! The verifier and login flow only need two operations from the store, so
//! they depend on [`CredentialStore`] rather than on a database handle. The
//! Postgres implementation is used in production; the in-memory one backs
//! tests and local experiments.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use super::queries;
use crate::models::auth::AdminUser;

/// Lookup and login bookkeeping for admin principals.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch a principal by username. `Ok(None)` when absent; `Err` only when
    /// the store itself failed.
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, AuthError>;

    /// Record a successful login.
    async fn touch_last_login(&self, id: Uuid) -> Result<(), AuthError>;
}

/// [`CredentialStore`] backed by the `admin_users` table.
#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, AuthError> {
        queries::find_admin_by_username(&self.pool, username).await
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), AuthError> {
        queries::update_last_login(&self.pool, id).await
    }
}

/// In-process [`CredentialStore`] keyed by username.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, AdminUser>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a principal with an already-hashed password.
    pub fn insert(&self, user: AdminUser) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user.username.clone(), user);
    }

    /// Build and insert an active principal, hashing `password`.
    pub fn add_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let user = AdminUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: super::password::hash_password(password)?,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        self.insert(user.clone());
        Ok(user)
    }

    /// Toggle `is_active`. Returns `false` when the username is unknown.
    pub fn set_active(&self, username: &str, is_active: bool) -> bool {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        match users.get_mut(username) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        }
    }

    /// Snapshot of a stored principal.
    pub fn get(&self, username: &str) -> Option<AdminUser> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, AuthError> {
        Ok(self.get(username))
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), AuthError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(user) = users.values_mut().find(|u| u.id == id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }
}
