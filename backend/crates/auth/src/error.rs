//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::repository::StoreError;
use crate::domain::service::token_codec::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Header telling clients that a silent refresh may help
pub const TOKEN_EXPIRED_HEADER: &str = "x-token-expired";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User name or email already registered")]
    AlreadyExists,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("No active session")]
    NoActiveSession,

    /// Stored refresh token is past its expiry; the session was removed
    #[error("Session expired")]
    SessionExpired,

    /// Another refresh rotated the session first
    #[error("Refresh token was already rotated")]
    ConflictingRefresh,

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Token signing failed: {0}")]
    SigningFailure(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Missing refresh token cookie")]
    MissingRefreshToken,

    #[error("Missing bearer token")]
    MissingBearer,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::NoActiveSession
            | AuthError::SessionExpired
            | AuthError::MissingBearer => ErrorKind::Unauthorized,
            AuthError::AlreadyExists | AuthError::ConflictingRefresh => ErrorKind::Conflict,
            AuthError::Validation(_) | AuthError::MissingRefreshToken => ErrorKind::BadRequest,
            AuthError::StoreUnavailable(_)
            | AuthError::DirectoryUnavailable(_)
            | AuthError::DeadlineExceeded => ErrorKind::ServiceUnavailable,
            AuthError::SigningFailure(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError. Server-side details stay in the log.
    pub fn to_app_error(&self) -> AppError {
        let err = if self.kind().is_server_error() {
            AppError::new(self.kind(), self.public_message())
        } else {
            AppError::new(self.kind(), self.to_string())
        };
        match self {
            AuthError::TokenExpired => err
                .with_action("Refresh the session")
                .with_header(TOKEN_EXPIRED_HEADER, "true"),
            AuthError::SessionExpired | AuthError::NoActiveSession => {
                err.with_action("Sign in again")
            }
            AuthError::ConflictingRefresh => err.with_action("Retry with the latest refresh token"),
            _ => err,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AuthError::StoreUnavailable(_) | AuthError::DeadlineExceeded => {
                "Session service temporarily unavailable"
            }
            AuthError::DirectoryUnavailable(_) => "User directory temporarily unavailable",
            _ => "Internal server error",
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "Session store unavailable");
            }
            AuthError::DirectoryUnavailable(msg) => {
                tracing::error!(error = %msg, "User directory unavailable");
            }
            AuthError::SigningFailure(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::DeadlineExceeded => {
                tracing::warn!("Auth request ran out of time");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::ConflictingRefresh | AuthError::InvalidToken => {
                tracing::warn!(error = %self, "Rejected token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::InvalidToken,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Signing(msg) => AuthError::SigningFailure(msg),
        }
    }
}
