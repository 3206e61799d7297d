//! Refresh Use Case
//!
//! Rotates the refresh session. The presented token must be exactly the
//! stored one, and the rotated token is committed with compare-and-swap
//! before the new access token is returned.

use std::sync::Arc;

use platform::crypto::constant_time_eq;

use crate::application::deadline::Deadline;
use crate::application::sign_in::IssuedSession;
use crate::application::token_issuer::TokenIssuer;
use crate::domain::repository::{SessionStore, UserDirectory};
use crate::domain::service::token_codec::TokenError;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

pub struct RefreshUseCase<D, S>
where
    D: UserDirectory,
    S: SessionStore,
{
    directory: Arc<D>,
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<D, S> RefreshUseCase<D, S>
where
    D: UserDirectory,
    S: SessionStore,
{
    pub fn new(directory: Arc<D>, store: Arc<S>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            directory,
            store,
            issuer,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        presented: &str,
        deadline: Deadline,
    ) -> AuthResult<IssuedSession> {
        let stored = deadline
            .store_call(self.store.get(user_id))
            .await?
            .ok_or(AuthError::NoActiveSession)?;

        if !constant_time_eq(stored.as_bytes(), presented.as_bytes()) {
            tracing::warn!(user_id = %user_id, "Refresh token does not match the active session");
            return Err(AuthError::InvalidToken);
        }

        let Some(identity) = deadline
            .directory_call(self.directory.find_by_id(user_id))
            .await?
        else {
            self.discard(user_id, &stored, deadline).await?;
            tracing::warn!(user_id = %user_id, "Session dropped for unknown user");
            return Err(AuthError::NoActiveSession);
        };

        deadline.ensure_time_left()?;
        let profile = self.issuer.profile_for(identity.role);
        let rotation = match self.issuer.rotate(&stored, profile) {
            Ok(rotation) => rotation,
            Err(TokenError::Expired) => {
                self.discard(user_id, &stored, deadline).await?;
                tracing::info!(user_id = %user_id, "Refresh session expired");
                return Err(AuthError::SessionExpired);
            }
            // stored token no longer verifies, e.g. the role moved to another profile
            Err(TokenError::Invalid) => {
                self.discard(user_id, &stored, deadline).await?;
                tracing::warn!(user_id = %user_id, "Stored refresh token failed verification");
                return Err(AuthError::InvalidToken);
            }
            Err(e) => return Err(e.into()),
        };
        if rotation.previous.user_id != *user_id {
            tracing::warn!(user_id = %user_id, "Refresh token belongs to another identity");
            return Err(AuthError::InvalidToken);
        }

        let committed = deadline
            .store_call(self.store.compare_and_swap(
                user_id,
                presented,
                &rotation.tokens.refresh_token,
                profile.refresh_ttl,
            ))
            .await?;
        if !committed {
            tracing::warn!(user_id = %user_id, "Concurrent refresh lost the race");
            return Err(AuthError::ConflictingRefresh);
        }

        tracing::info!(user_id = %user_id, "Session refreshed");

        Ok(IssuedSession {
            identity: rotation.previous.identity(),
            tokens: rotation.tokens,
            access_ttl: profile.access_ttl,
            refresh_ttl: profile.refresh_ttl,
        })
    }

    /// Drop the session only if it still holds `stored`; a login that
    /// landed meanwhile keeps its new session
    async fn discard(&self, user_id: &UserId, stored: &str, deadline: Deadline) -> AuthResult<()> {
        let removed = deadline
            .store_call(self.store.remove_if(user_id, stored))
            .await?;
        if !removed {
            tracing::debug!(user_id = %user_id, "Session replaced before cleanup, kept");
        }
        Ok(())
    }
}
