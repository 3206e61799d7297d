//! API DTOs (Data Transfer Objects)
//!
//! Refresh tokens never appear here; they travel only in the HttpOnly
//! cookie.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::user_id::UserId;

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub user_name: String,
    pub password: String,
    /// `customer` (default) or `seller`
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user_id: UserId,
}

// ============================================================================
// Sign In / Refresh
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub user_id: UserId,
}

/// Body returned by sign in and refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub user_id: UserId,
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

// ============================================================================
// Sign Out
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutRequest {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignOutResponse {
    pub success: bool,
}

// ============================================================================
// Privilege / Current User
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: UserId,
    pub user_name: String,
    pub email: String,
    pub role: String,
    /// Access token expiry (unix seconds)
    pub expires_at: i64,
}
