//! Repository Traits
//!
//! Interfaces for session and identity persistence. Implementations live
//! in the infrastructure layer.

use std::time::Duration;

use platform::password::ClearTextPassword;
use thiserror::Error;

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_role::Role,
};
use crate::error::AuthResult;

/// Session store failure. Absence of a session is `Ok(None)`, never this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Refresh session store: one live refresh token per identity
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Unconditionally store the refresh token, replacing any previous one
    async fn save(&self, user_id: &UserId, refresh_token: &str, ttl: Duration)
    -> Result<(), StoreError>;

    /// Current refresh token, `None` when no session is active
    async fn get(&self, user_id: &UserId) -> Result<Option<String>, StoreError>;

    /// Drop the session. Removing a missing session succeeds.
    async fn remove(&self, user_id: &UserId) -> Result<(), StoreError>;

    /// Atomically drop the session only while it still holds `expected`.
    /// Returns `false` when absent or already replaced.
    async fn remove_if(&self, user_id: &UserId, expected: &str) -> Result<bool, StoreError>;

    /// Atomically replace the stored token with `replacement` only while it
    /// still equals `expected`. Returns `false` when absent or changed.
    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected: &str,
        replacement: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError>;
}

/// Checks a username/password pair
#[trait_variant::make(CredentialVerifier: Send)]
pub trait LocalCredentialVerifier {
    /// Unknown user and wrong password both fail with `InvalidCredentials`
    async fn verify(&self, username: &str, password: &ClearTextPassword) -> AuthResult<Identity>;
}

/// Account registered through sign up
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub username: UserName,
    pub password: ClearTextPassword,
    pub role: Role,
}

/// Identity lookup and registration
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    /// Fails with `AlreadyExists` when the username or email is taken
    async fn register(&self, user: NewUser) -> AuthResult<UserId>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Identity>>;

    async fn has_role(&self, user_id: &UserId, role: Role) -> AuthResult<bool>;
}
