//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Cookie path; the browser only sends the refresh token to the auth routes
    pub refresh_cookie_path: String,
    pub cookie_domain: Option<String>,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Budget for each request's store and directory calls
    pub call_timeout: Duration,
    /// Session store key prefix (`{prefix}:{user_id}`)
    pub session_key_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            refresh_cookie_name: "refresh_token".to_string(),
            refresh_cookie_path: "/api/auth".to_string(),
            cookie_domain: None,
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            call_timeout: Duration::from_secs(3),
            session_key_prefix: "refresh_token".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Default::default()
        }
    }

    /// Cookie carrying the refresh token
    pub fn refresh_cookie(&self, max_age_secs: Option<u64>) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.refresh_cookie_path.clone(),
            domain: self.cookie_domain.clone(),
            max_age_secs,
        }
    }
}
