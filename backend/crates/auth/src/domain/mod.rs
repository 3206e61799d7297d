//! Domain Layer
//!
//! Contains entities, value objects, domain services, and repository traits.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{Claims, Identity, TokenPair, TokenProfile, TokenProfiles};
pub use repository::{CredentialVerifier, SessionStore, StoreError, UserDirectory};
