//! Admin principal queries against `admin_users`.

use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::auth::AdminUser;

const ADMIN_COLUMNS: &str =
    "id, username, email, password_hash, is_active, created_at, last_login";

/// Fetch an admin by username.
pub async fn find_admin_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AdminUser>, AuthError> {
    let sql = format!("SELECT {ADMIN_COLUMNS} FROM admin_users WHERE username = $1");
    let row = sqlx::query_as::<_, AdminUser>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Stamp `last_login` with the current time.
pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<(), AuthError> {
    sqlx::query("UPDATE admin_users SET last_login = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert a new, active admin. The password must already be hashed.
pub async fn create_admin(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<AdminUser, AuthError> {
    let sql = format!(
        "INSERT INTO admin_users (id, username, email, password_hash, is_active) \
         VALUES ($1, $2, $3, $4, TRUE) RETURNING {ADMIN_COLUMNS}"
    );
    sqlx::query_as::<_, AdminUser>(&sql)
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let taken = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if taken {
                AuthError::ValidationError(format!("username '{username}' is already taken"))
            } else {
                AuthError::from(e)
            }
        })
}

/// Enable or disable an admin. Returns `false` when no such username exists.
pub async fn set_admin_active(
    pool: &PgPool,
    username: &str,
    is_active: bool,
) -> Result<bool, AuthError> {
    let result = sqlx::query("UPDATE admin_users SET is_active = $2 WHERE username = $1")
        .bind(username)
        .bind(is_active)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
