//! Token Profiles
//!
//! Signing secrets and lifetimes, keyed by role family. Built once at
//! startup and shared read-only.

use std::fmt;
use std::time::Duration;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::value_object::user_role::{Role, RoleFamily};
use crate::error::AuthError;

/// Minimum HMAC-SHA256 key length accepted for token secrets
pub const MIN_SECRET_LENGTH: usize = 32;

/// Signing key bytes, zeroized on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TokenSecret(Vec<u8>);

impl TokenSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::Validation(format!(
                "token secret must be at least {MIN_SECRET_LENGTH} bytes (got {})",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Random secret for development and tests
    pub fn random() -> Self {
        Self(platform::crypto::random_bytes(48))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret([REDACTED])")
    }
}

#[derive(Debug, Clone)]
pub struct TokenProfile {
    pub access_secret: TokenSecret,
    pub access_ttl: Duration,
    pub refresh_secret: TokenSecret,
    pub refresh_ttl: Duration,
}

impl TokenProfile {
    pub fn new(
        access_secret: TokenSecret,
        access_ttl: Duration,
        refresh_secret: TokenSecret,
        refresh_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if access_ttl.as_secs() == 0 || refresh_ttl.as_secs() == 0 {
            return Err(AuthError::Validation(
                "token lifetimes must be at least one second".to_string(),
            ));
        }
        // an access token must never verify as a refresh token
        if access_secret == refresh_secret {
            return Err(AuthError::Validation(
                "access and refresh secrets must differ".to_string(),
            ));
        }
        Ok(Self {
            access_secret,
            access_ttl,
            refresh_secret,
            refresh_ttl,
        })
    }

    /// Random secrets with the given lifetimes
    pub fn random(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            access_secret: TokenSecret::random(),
            access_ttl,
            refresh_secret: TokenSecret::random(),
            refresh_ttl,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        i64::try_from(self.access_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        i64::try_from(self.refresh_ttl.as_secs()).unwrap_or(i64::MAX)
    }
}

/// Role family → profile lookup. Customer and seller fall back to the
/// default profile when not configured.
#[derive(Debug, Clone)]
pub struct TokenProfiles {
    default: TokenProfile,
    customer: Option<TokenProfile>,
    seller: Option<TokenProfile>,
}

impl TokenProfiles {
    pub fn new(default: TokenProfile) -> Self {
        Self {
            default,
            customer: None,
            seller: None,
        }
    }

    pub fn with_profile(mut self, family: RoleFamily, profile: TokenProfile) -> Self {
        match family {
            RoleFamily::Default => self.default = profile,
            RoleFamily::Customer => self.customer = Some(profile),
            RoleFamily::Seller => self.seller = Some(profile),
        }
        self
    }

    /// 15 minute access, 30 day refresh, random secrets per family
    pub fn development() -> Self {
        let access = Duration::from_secs(15 * 60);
        let refresh = Duration::from_secs(30 * 24 * 3600);
        Self::new(TokenProfile::random(access, refresh))
            .with_profile(RoleFamily::Customer, TokenProfile::random(access, refresh))
            .with_profile(RoleFamily::Seller, TokenProfile::random(access, refresh))
    }

    /// Family whose profile actually serves `role`
    pub fn resolve_family(&self, role: Role) -> RoleFamily {
        match role.family() {
            RoleFamily::Customer if self.customer.is_some() => RoleFamily::Customer,
            RoleFamily::Seller if self.seller.is_some() => RoleFamily::Seller,
            _ => RoleFamily::Default,
        }
    }

    pub fn profile_for(&self, role: Role) -> &TokenProfile {
        self.profile_for_family(self.resolve_family(role))
    }

    pub fn profile_for_family(&self, family: RoleFamily) -> &TokenProfile {
        match family {
            RoleFamily::Customer => self.customer.as_ref().unwrap_or(&self.default),
            RoleFamily::Seller => self.seller.as_ref().unwrap_or(&self.default),
            RoleFamily::Default => &self.default,
        }
    }

    /// Configured families with their profiles, default first
    pub fn families(&self) -> impl Iterator<Item = (RoleFamily, &TokenProfile)> {
        std::iter::once((RoleFamily::Default, &self.default))
            .chain(self.customer.iter().map(|p| (RoleFamily::Customer, p)))
            .chain(self.seller.iter().map(|p| (RoleFamily::Seller, p)))
    }
}

/// Freshly issued access + refresh tokens
#[derive(Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: i64,
    pub refresh_expires_at: i64,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish()
    }
}
