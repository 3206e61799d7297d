//! PostgreSQL user directory

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, HashedPassword, verify_decoy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::{CredentialVerifier, NewUser, UserDirectory};
use crate::domain::value_object::{user_id::UserId, user_name::UserName, user_role::Role};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user directory (`auth_users` table)
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
    pepper: Option<Arc<[u8]>>,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, pepper: None }
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        let pepper: Vec<u8> = pepper.into();
        self.pepper = Some(Arc::from(pepper));
        self
    }
}

/// Connection-level failures make the directory unavailable; everything
/// else is a database error.
fn db_error(err: sqlx::Error) -> AuthError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AuthError::DirectoryUnavailable(err.to_string())
        }
        other => AuthError::Database(other),
    }
}

impl CredentialVerifier for PgUserDirectory {
    async fn verify(&self, username: &str, password: &ClearTextPassword) -> AuthResult<Identity> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT
                user_id,
                user_name,
                email,
                password_hash,
                user_role,
                created_at
            FROM auth_users
            WHERE user_name_canonical = $1
            "#,
        )
        .bind(UserName::canonicalize(username))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        let Some(row) = row else {
            verify_decoy(password, self.pepper.as_deref());
            return Err(AuthError::InvalidCredentials);
        };

        let hash = HashedPassword::from_phc_string(&row.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !hash.verify(password, self.pepper.as_deref()) {
            return Err(AuthError::InvalidCredentials);
        }

        row.into_identity()
    }
}

impl UserDirectory for PgUserDirectory {
    async fn register(&self, user: NewUser) -> AuthResult<UserId> {
        let hash = user
            .password
            .hash(self.pepper.as_deref())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // unique on user_name_canonical and email
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO auth_users (
                user_id,
                user_name,
                user_name_canonical,
                email,
                password_hash,
                user_role
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            RETURNING user_id
            "#,
        )
        .bind(UserId::new().into_uuid())
        .bind(user.username.as_str())
        .bind(user.username.canonical())
        .bind(user.email.as_str())
        .bind(hash.as_phc_string())
        .bind(user.role.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        inserted
            .map(UserId::from_uuid)
            .ok_or(AuthError::AlreadyExists)
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Identity>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT
                user_id,
                user_name,
                email,
                password_hash,
                user_role,
                created_at
            FROM auth_users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(UserRow::into_identity).transpose()
    }

    async fn has_role(&self, user_id: &UserId, role: Role) -> AuthResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM auth_users WHERE user_id = $1 AND user_role = $2)",
        )
        .bind(user_id.as_uuid())
        .bind(role.id())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    user_name: String,
    email: String,
    password_hash: String,
    user_role: i16,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_identity(self) -> AuthResult<Identity> {
        Ok(Identity::new(
            UserId::from_uuid(self.user_id),
            self.user_name,
            self.email,
            Role::from_id(self.user_role)?,
        ))
    }
}
