//! Token Claims
//!
//! Payload shared by access and refresh tokens. The two kinds differ only
//! in `exp` and in the secret that signs them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{user_id::UserId, user_role::Role};

/// Current claims schema version
pub const CLAIMS_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Schema version
    pub ver: u8,
    /// Unique token id
    pub jti: Uuid,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn for_identity(identity: &Identity, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            ver: CLAIMS_VERSION,
            jti: Uuid::new_v4(),
            user_id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id, &self.username, &self.email, self.role)
    }

    /// `exp == now` counts as expired
    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now
    }
}
