//! Auth Session Core
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, token codec, repository traits
//! - `application/` - Token issuer, use cases, session orchestrator
//! - `infra/` - Redis / in-memory session stores, Postgres / in-memory user directories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Short-lived HMAC-SHA256 access tokens, verified statelessly
//! - Server-side refresh sessions, one per identity, revocable at sign out
//! - Refresh token rotation committed with compare-and-swap
//! - Role-scoped token profiles (customer, seller, default)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Refresh tokens travel only in an HttpOnly cookie
//! - A replayed or stale refresh token is rejected, a lost rotation race
//!   is reported as a conflict
//! - Store timeouts surface as unavailability, never as "signed out"

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{Deadline, SessionOrchestrator, TokenIssuer};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemorySessionStore, InMemoryUserDirectory, PgUserDirectory, RedisSessionStore};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::{
        email::Email,
        user_id::UserId,
        user_name::UserName,
        user_role::{Role, RoleFamily},
    };
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::{SessionStore, StoreError};
    pub use crate::infra::memory::InMemorySessionStore;
    pub use crate::infra::redis::RedisSessionStore;
}

pub mod clock {
    pub use crate::domain::service::clock::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
