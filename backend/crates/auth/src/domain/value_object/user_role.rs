use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AuthError;

/// Account role. Numeric ids are the storage encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum Role {
    #[default]
    Customer = 0,
    Seller = 1,
    Admin = 2,
    /// Generic user with no storefront role
    User = 3,
}

/// Key selecting a token profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RoleFamily {
    #[display("default")]
    Default,
    #[display("customer")]
    Customer,
    #[display("seller")]
    Seller,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Customer, Role::Seller, Role::Admin, Role::User];

    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Customer => "customer",
            Seller => "seller",
            Admin => "admin",
            User => "user",
        }
    }

    #[inline]
    pub const fn family(&self) -> RoleFamily {
        match self {
            Role::Customer => RoleFamily::Customer,
            Role::Seller => RoleFamily::Seller,
            Role::Admin | Role::User => RoleFamily::Default,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Roles an anonymous caller may pick at sign up
    #[inline]
    pub const fn can_self_register(&self) -> bool {
        matches!(self, Role::Customer | Role::Seller)
    }

    pub fn from_id(id: i16) -> Result<Self, AuthError> {
        use Role::*;
        match id {
            0 => Ok(Customer),
            1 => Ok(Seller),
            2 => Ok(Admin),
            3 => Ok(User),
            _ => {
                tracing::error!(role_id = id, "Invalid role id");
                Err(AuthError::Internal(format!("invalid role id {id}")))
            }
        }
    }

    pub fn from_code(code: &str) -> Result<Self, AuthError> {
        use Role::*;
        match code.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Customer),
            "seller" => Ok(Seller),
            "admin" => Ok(Admin),
            "user" => Ok(User),
            other => Err(AuthError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
