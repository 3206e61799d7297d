//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no knowledge of sessions:
//! - HMAC-SHA256, base64url and constant-time helpers
//! - Password hashing (Argon2id)
//! - Cookie building and extraction

pub mod cookie;
pub mod crypto;
pub mod password;
