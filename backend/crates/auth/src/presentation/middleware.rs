//! Auth Middleware
//!
//! Bearer access-token check for protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domain::entity::claims::Claims;
use crate::domain::repository::{CredentialVerifier, SessionStore, UserDirectory};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Verified caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

/// Rejects the request unless it carries a valid access token.
/// Expired tokens answer 401 with `x-token-expired: true`.
pub async fn require_access_token<D, S>(
    State(state): State<AuthAppState<D, S>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let Some(token) = bearer_token(req.headers()) else {
        return AuthError::MissingBearer.into_response();
    };

    match state.orchestrator.authenticate(token) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthenticatedUser { claims });
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// `Authorization: Bearer <token>`; the scheme is case-insensitive
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&with_auth("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&with_auth("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&with_auth("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&with_auth("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
