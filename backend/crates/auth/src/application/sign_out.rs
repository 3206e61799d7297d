//! Sign Out Use Case
//!
//! Revokes the identity's refresh session. Signing out twice is fine.
//! A caller-initiated sign out must present the stored refresh token.

use std::sync::Arc;

use crate::application::deadline::Deadline;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

pub struct SignOutUseCase<S>
where
    S: SessionStore,
{
    store: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, user_id: &UserId, deadline: Deadline) -> AuthResult<()> {
        deadline.store_call(self.store.remove(user_id)).await?;

        tracing::info!(user_id = %user_id, "User signed out");
        Ok(())
    }

    /// Revoke only when `presented` is the active refresh token.
    /// No session at all is already signed out.
    pub async fn execute_with_token(
        &self,
        user_id: &UserId,
        presented: &str,
        deadline: Deadline,
    ) -> AuthResult<()> {
        let removed = deadline
            .store_call(self.store.remove_if(user_id, presented))
            .await?;
        if removed {
            tracing::info!(user_id = %user_id, "User signed out");
            return Ok(());
        }

        if deadline.store_call(self.store.get(user_id)).await?.is_some() {
            tracing::warn!(user_id = %user_id, "Sign out with a token that is not the active session");
            return Err(AuthError::InvalidToken);
        }
        Ok(())
    }
}
