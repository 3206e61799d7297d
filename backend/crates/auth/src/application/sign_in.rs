//! Sign In Use Case
//!
//! Verifies credentials, issues a token pair with the role's profile and
//! records the refresh token as the identity's only live session.

use std::sync::Arc;
use std::time::Duration;

use platform::password::ClearTextPassword;

use crate::application::deadline::Deadline;
use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::{identity::Identity, token_profile::TokenPair};
use crate::domain::repository::{CredentialVerifier, SessionStore};
use crate::error::AuthResult;

pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Tokens handed back after sign in or refresh. The refresh token is for
/// the cookie only.
#[derive(Debug)]
pub struct IssuedSession {
    pub identity: Identity,
    pub tokens: TokenPair,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

pub struct SignInUseCase<V, S>
where
    V: CredentialVerifier,
    S: SessionStore,
{
    verifier: Arc<V>,
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<V, S> SignInUseCase<V, S>
where
    V: CredentialVerifier,
    S: SessionStore,
{
    pub fn new(verifier: Arc<V>, store: Arc<S>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            verifier,
            store,
            issuer,
        }
    }

    pub async fn execute(&self, input: SignInInput, deadline: Deadline) -> AuthResult<IssuedSession> {
        let password = ClearTextPassword::for_verification(input.password);
        let identity = deadline
            .directory_call(self.verifier.verify(&input.user_name, &password))
            .await?;

        deadline.ensure_time_left()?;
        let profile = self.issuer.profile_for(identity.role);
        let tokens = self.issuer.issue_pair_with(&identity, profile)?;

        // replaces any earlier session of this identity
        deadline
            .store_call(
                self.store
                    .save(&identity.id, &tokens.refresh_token, profile.refresh_ttl),
            )
            .await?;

        tracing::info!(user_id = %identity.id, role = %identity.role, "User signed in");

        Ok(IssuedSession {
            identity,
            tokens,
            access_ttl: profile.access_ttl,
            refresh_ttl: profile.refresh_ttl,
        })
    }
}
