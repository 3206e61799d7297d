//! Identity Entity
//!
//! What a successful credential check returns. Immutable once built.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::{user_id::UserId, user_role::Role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            role,
        }
    }
}
