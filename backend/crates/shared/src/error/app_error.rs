//! Application Error
//!
//! [`AppError`] is what transport adapters render. Domain crates keep their
//! own typed errors and convert at the edge.

use std::borrow::Cow;
use std::fmt;

use super::kind::ErrorKind;

/// Client-facing error: a kind, a message safe to show, an optional next
/// step and extra response headers.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::Unauthorized, "Token expired")
///     .with_action("Refresh the session")
///     .with_header("x-token-expired", "true");
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.headers(), &[("x-token-expired", "true")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
    headers: Vec<(&'static str, &'static str)>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            headers: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Header names must be lowercase
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    #[inline]
    pub fn headers(&self) -> &[(&'static str, &'static str)] {
        &self.headers
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error() {
        let err = AppError::new(ErrorKind::Conflict, "Refresh already used");
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "Refresh already used");
        assert!(err.action().is_none());
        assert!(err.headers().is_empty());
    }

    #[test]
    fn test_display_with_action() {
        let err = AppError::new(ErrorKind::Unauthorized, "Session expired")
            .with_action("Sign in again");
        assert_eq!(
            err.to_string(),
            "[Unauthorized] Session expired (Action: Sign in again)"
        );
    }
}
