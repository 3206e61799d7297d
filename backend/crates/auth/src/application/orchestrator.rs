//! Session Orchestrator
//!
//! Entry point for the HTTP layer. Owns the use cases and hands each
//! request a fresh deadline derived from `AuthConfig::call_timeout`.
//!
//! Per identity the session moves `NoSession -> Active` on sign in,
//! `Active -> Active` on refresh and back to `NoSession` on sign out or
//! expiry.

use std::sync::Arc;

use crate::application::check_privilege::CheckPrivilegeUseCase;
use crate::application::config::AuthConfig;
use crate::application::deadline::Deadline;
use crate::application::refresh::RefreshUseCase;
use crate::application::sign_in::{IssuedSession, SignInInput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::claims::Claims;
use crate::domain::repository::{CredentialVerifier, SessionStore, UserDirectory};
use crate::domain::value_object::{user_id::UserId, user_role::Role};
use crate::error::AuthResult;

pub struct SessionOrchestrator<D, S>
where
    D: UserDirectory + CredentialVerifier,
    S: SessionStore,
{
    sign_up: SignUpUseCase<D>,
    sign_in: SignInUseCase<D, S>,
    refresh: RefreshUseCase<D, S>,
    sign_out: SignOutUseCase<S>,
    privilege: CheckPrivilegeUseCase<D>,
    issuer: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<D, S> SessionOrchestrator<D, S>
where
    D: UserDirectory + CredentialVerifier,
    S: SessionStore,
{
    pub fn new(
        directory: Arc<D>,
        store: Arc<S>,
        issuer: Arc<TokenIssuer>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            sign_up: SignUpUseCase::new(directory.clone()),
            sign_in: SignInUseCase::new(directory.clone(), store.clone(), issuer.clone()),
            refresh: RefreshUseCase::new(directory.clone(), store.clone(), issuer.clone()),
            sign_out: SignOutUseCase::new(store),
            privilege: CheckPrivilegeUseCase::new(directory),
            issuer,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.config.call_timeout)
    }

    pub async fn register(&self, input: SignUpInput, deadline: Deadline) -> AuthResult<UserId> {
        self.sign_up.execute(input, deadline).await
    }

    pub async fn login(
        &self,
        user_name: impl Into<String>,
        password: impl Into<String>,
        deadline: Deadline,
    ) -> AuthResult<IssuedSession> {
        let input = SignInInput {
            user_name: user_name.into(),
            password: password.into(),
        };
        self.sign_in.execute(input, deadline).await
    }

    pub async fn refresh(
        &self,
        user_id: &UserId,
        presented_refresh_token: &str,
        deadline: Deadline,
    ) -> AuthResult<IssuedSession> {
        self.refresh
            .execute(user_id, presented_refresh_token, deadline)
            .await
    }

    pub async fn logout(&self, user_id: &UserId, deadline: Deadline) -> AuthResult<()> {
        self.sign_out.execute(user_id, deadline).await
    }

    /// Logout on behalf of the session holder, proven by its refresh token
    pub async fn sign_out(
        &self,
        user_id: &UserId,
        presented_refresh_token: &str,
        deadline: Deadline,
    ) -> AuthResult<()> {
        self.sign_out
            .execute_with_token(user_id, presented_refresh_token, deadline)
            .await
    }

    pub async fn is_privileged(
        &self,
        user_id: &UserId,
        required: Role,
        deadline: Deadline,
    ) -> AuthResult<bool> {
        self.privilege
            .is_privileged(user_id, required, deadline)
            .await
    }

    pub async fn is_admin(&self, user_id: &UserId, deadline: Deadline) -> AuthResult<bool> {
        self.privilege.is_admin(user_id, deadline).await
    }

    /// Verify an access token presented as a bearer credential
    pub fn authenticate(&self, access_token: &str) -> AuthResult<Claims> {
        Ok(self.issuer.authenticate(access_token)?)
    }
}
