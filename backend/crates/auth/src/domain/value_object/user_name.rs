//! User Name Value Object
//!
//! The login handle. Input is NFKC-normalized before validation; the
//! display form keeps the caller's casing while uniqueness and lookup use
//! the lowercase canonical form.
//!
//! Invariants:
//! - 3 to 32 characters after normalization
//! - ASCII letters, digits and `_ . -` only
//! - starts with a letter or digit

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

use crate::error::AuthError;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 32;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName {
    display: String,
    canonical: String,
}

impl UserName {
    pub fn new(raw: &str) -> Result<Self, AuthError> {
        let display: String = raw.trim().nfkc().collect();
        let length = display.chars().count();

        if length < USER_NAME_MIN_LENGTH || length > USER_NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "user name must be {USER_NAME_MIN_LENGTH} to {USER_NAME_MAX_LENGTH} characters"
            )));
        }
        if let Some(bad) = display
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !ALLOWED_SPECIAL_CHARS.contains(c))
        {
            return Err(AuthError::Validation(format!(
                "user name contains invalid character '{bad}'"
            )));
        }
        if !display.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(AuthError::Validation(
                "user name must start with a letter or digit".to_string(),
            ));
        }

        let canonical = display.to_ascii_lowercase();
        Ok(Self { display, canonical })
    }

    /// Canonical form for a sign-in lookup. Never fails; an unusable handle
    /// simply matches nobody.
    pub fn canonicalize(raw: &str) -> String {
        raw.trim().nfkc().collect::<String>().to_ascii_lowercase()
    }

    pub fn from_db(display: impl Into<String>) -> Self {
        let display = display.into();
        let canonical = display.to_ascii_lowercase();
        Self { display, canonical }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        let name = UserName::new("Bob_the.Seller-1").unwrap();
        assert_eq!(name.as_str(), "Bob_the.Seller-1");
        assert_eq!(name.canonical(), "bob_the.seller-1");
    }

    #[test]
    fn test_user_name_length_bounds() {
        assert!(UserName::new("ab").is_err());
        assert!(UserName::new("abc").is_ok());
        assert!(UserName::new(&"a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
        assert!(UserName::new(&"a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_user_name_rejects_symbols() {
        assert!(UserName::new("bob smith").is_err());
        assert!(UserName::new("bob@shop").is_err());
        assert!(UserName::new("_bob").is_err());
    }

    #[test]
    fn test_user_name_nfkc() {
        // fullwidth letters fold to ASCII
        let name = UserName::new("ｂｏｂ").unwrap();
        assert_eq!(name.canonical(), "bob");
        assert_eq!(UserName::canonicalize(" ＢＯＢ "), "bob");
    }
}
