//! Token Issuer
//!
//! Mints and verifies access/refresh tokens with the profile that serves
//! an identity's role. There is one code path for every role; the role
//! only selects data.

use std::sync::Arc;

use crate::domain::entity::{
    claims::Claims,
    identity::Identity,
    token_profile::{TokenPair, TokenProfile, TokenProfiles},
};
use crate::domain::service::clock::Clock;
use crate::domain::service::token_codec::{self, TokenError};
use crate::domain::value_object::user_role::Role;

/// Result of rotating a refresh token
#[derive(Debug)]
pub struct Rotation {
    /// Claims of the token being replaced
    pub previous: Claims,
    pub tokens: TokenPair,
}

pub struct TokenIssuer {
    profiles: Arc<TokenProfiles>,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(profiles: Arc<TokenProfiles>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }

    pub fn profiles(&self) -> &TokenProfiles {
        &self.profiles
    }

    pub fn profile_for(&self, role: Role) -> &TokenProfile {
        self.profiles.profile_for(role)
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Returns the token and its `exp`
    pub fn issue_access_token(
        &self,
        identity: &Identity,
        profile: &TokenProfile,
    ) -> Result<(String, i64), TokenError> {
        let claims = Claims::for_identity(identity, self.now(), profile.access_ttl_secs());
        let token = token_codec::sign(&claims, &profile.access_secret)?;
        Ok((token, claims.exp))
    }

    /// Returns the token and its `exp`
    pub fn issue_refresh_token(
        &self,
        identity: &Identity,
        profile: &TokenProfile,
    ) -> Result<(String, i64), TokenError> {
        let claims = Claims::for_identity(identity, self.now(), profile.refresh_ttl_secs());
        let token = token_codec::sign(&claims, &profile.refresh_secret)?;
        Ok((token, claims.exp))
    }

    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, TokenError> {
        self.issue_pair_with(identity, self.profile_for(identity.role))
    }

    pub fn issue_pair_with(
        &self,
        identity: &Identity,
        profile: &TokenProfile,
    ) -> Result<TokenPair, TokenError> {
        let (access_token, access_expires_at) = self.issue_access_token(identity, profile)?;
        let (refresh_token, refresh_expires_at) = self.issue_refresh_token(identity, profile)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    pub fn verify_access_token(&self, token: &str, role: Role) -> Result<Claims, TokenError> {
        token_codec::verify(token, &self.profile_for(role).access_secret, self.now())
    }

    pub fn verify_refresh_token(
        &self,
        token: &str,
        profile: &TokenProfile,
    ) -> Result<Claims, TokenError> {
        token_codec::verify(token, &profile.refresh_secret, self.now())
    }

    /// Verify `old_refresh_token` and mint a fresh pair for the same identity
    pub fn rotate(
        &self,
        old_refresh_token: &str,
        profile: &TokenProfile,
    ) -> Result<Rotation, TokenError> {
        let previous = self.verify_refresh_token(old_refresh_token, profile)?;
        let tokens = self.issue_pair_with(&previous.identity(), profile)?;
        Ok(Rotation { previous, tokens })
    }

    /// Verify an access token without trusting its payload to pick the
    /// secret. The role inside the verified claims must map back to the
    /// family whose secret verified it.
    pub fn authenticate(&self, access_token: &str) -> Result<Claims, TokenError> {
        let now = self.now();
        let mut expired = false;

        for (family, profile) in self.profiles.families() {
            match token_codec::verify(access_token, &profile.access_secret, now) {
                Ok(claims) if self.profiles.resolve_family(claims.role) == family => {
                    return Ok(claims);
                }
                Ok(_) => return Err(TokenError::Invalid),
                Err(TokenError::Expired) => expired = true,
                Err(_) => {}
            }
        }

        Err(if expired {
            TokenError::Expired
        } else {
            TokenError::Invalid
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::service::clock::ManualClock;
    use crate::domain::value_object::{user_id::UserId, user_role::RoleFamily};

    const START: i64 = 1_700_000_000;

    fn issuer() -> (TokenIssuer, ManualClock) {
        let clock = ManualClock::new(START);
        let profiles = TokenProfiles::new(TokenProfile::random(
            Duration::from_secs(5),
            Duration::from_secs(30),
        ))
        .with_profile(
            RoleFamily::Seller,
            TokenProfile::random(Duration::from_secs(60), Duration::from_secs(600)),
        );
        (
            TokenIssuer::new(Arc::new(profiles), Arc::new(clock.clone())),
            clock,
        )
    }

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new(), "bob", "bob@example.com", role)
    }

    #[test]
    fn test_issue_pair_uses_role_profile() {
        let (issuer, _) = issuer();
        let customer = issuer.issue_pair(&identity(Role::Customer)).unwrap();
        assert_eq!(customer.access_expires_at, START + 5);
        assert_eq!(customer.refresh_expires_at, START + 30);

        let seller = issuer.issue_pair(&identity(Role::Seller)).unwrap();
        assert_eq!(seller.access_expires_at, START + 60);
        assert_eq!(seller.refresh_expires_at, START + 600);
    }

    #[test]
    fn test_access_and_refresh_secrets_are_not_interchangeable() {
        let (issuer, _) = issuer();
        let bob = identity(Role::Customer);
        let pair = issuer.issue_pair(&bob).unwrap();
        let profile = issuer.profile_for(Role::Customer);

        assert_eq!(
            issuer.verify_refresh_token(&pair.access_token, profile),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            issuer.verify_access_token(&pair.refresh_token, Role::Customer),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_rotate_issues_new_tokens() {
        let (issuer, clock) = issuer();
        let bob = identity(Role::Customer);
        let profile = issuer.profile_for(bob.role);
        let first = issuer.issue_pair(&bob).unwrap();

        clock.advance(6);
        let rotation = issuer.rotate(&first.refresh_token, profile).unwrap();
        assert_eq!(rotation.previous.user_id, bob.id);
        assert_ne!(rotation.tokens.refresh_token, first.refresh_token);
        assert_ne!(rotation.tokens.access_token, first.access_token);
        assert_eq!(rotation.tokens.access_expires_at, START + 11);
    }

    #[test]
    fn test_rotate_expired_refresh_token() {
        let (issuer, clock) = issuer();
        let bob = identity(Role::Customer);
        let pair = issuer.issue_pair(&bob).unwrap();
        clock.advance(30);
        assert_eq!(
            issuer
                .rotate(&pair.refresh_token, issuer.profile_for(bob.role))
                .unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_authenticate_across_families() {
        let (issuer, clock) = issuer();
        let seller = issuer.issue_pair(&identity(Role::Seller)).unwrap();
        let admin = issuer.issue_pair(&identity(Role::Admin)).unwrap();

        assert_eq!(issuer.authenticate(&seller.access_token).unwrap().role, Role::Seller);
        assert_eq!(issuer.authenticate(&admin.access_token).unwrap().role, Role::Admin);
        assert_eq!(issuer.authenticate("garbage"), Err(TokenError::Invalid));

        clock.advance(5);
        assert_eq!(issuer.authenticate(&admin.access_token), Err(TokenError::Expired));
        assert!(issuer.authenticate(&seller.access_token).is_ok());
    }

    #[test]
    fn test_authenticate_rejects_role_from_other_family() {
        let (issuer, _) = issuer();
        // seller claims signed with the default family's secret
        let mut forged = identity(Role::Seller);
        let default_profile = issuer.profile_for(Role::Admin);
        let (token, _) = issuer.issue_access_token(&forged, default_profile).unwrap();
        assert_eq!(issuer.authenticate(&token), Err(TokenError::Invalid));

        forged.role = Role::Customer;
        let (token, _) = issuer.issue_access_token(&forged, default_profile).unwrap();
        assert_eq!(issuer.authenticate(&token).unwrap().role, Role::Customer);
    }

    #[test]
    fn test_unknown_secret_is_invalid() {
        let (issuer, _) = issuer();
        let foreign = TokenProfile::random(Duration::from_secs(5), Duration::from_secs(30));
        let (token, _) = issuer
            .issue_access_token(&identity(Role::Customer), &foreign)
            .unwrap();
        assert_eq!(issuer.authenticate(&token), Err(TokenError::Invalid));
    }
}
