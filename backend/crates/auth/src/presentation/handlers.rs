//! HTTP Handlers

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

use platform::cookie::{extract_cookie, to_header_value};

use crate::application::{IssuedSession, SessionOrchestrator, SignUpInput};
use crate::domain::repository::{CredentialVerifier, SessionStore, UserDirectory};
use crate::domain::value_object::{user_id::UserId, user_role::Role};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    IsAdminResponse, MeResponse, RefreshRequest, SignInRequest, SignOutRequest, SignOutResponse,
    SignUpRequest, SignUpResponse, TokenResponse,
};
use crate::presentation::extract::ApiJson;
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
pub struct AuthAppState<D, S>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    pub orchestrator: Arc<SessionOrchestrator<D, S>>,
}

// D and S need not be Clone
impl<D, S> Clone for AuthAppState<D, S>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: self.orchestrator.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<D, S>(
    State(state): State<AuthAppState<D, S>>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let role = req.role.as_deref().map(Role::from_code).transpose()?;
    let input = SignUpInput {
        email: req.email,
        user_name: req.user_name,
        password: req.password,
        role,
    };

    let orchestrator = &state.orchestrator;
    let user_id = orchestrator.register(input, orchestrator.deadline()).await?;

    Ok((StatusCode::CREATED, Json(SignUpResponse { user_id })))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<D, S>(
    State(state): State<AuthAppState<D, S>>,
    ApiJson(req): ApiJson<SignInRequest>,
) -> AuthResult<Response>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let orchestrator = &state.orchestrator;
    let session = orchestrator
        .login(req.user_name, req.password, orchestrator.deadline())
        .await?;

    token_response(orchestrator, session)
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<D, S>(
    State(state): State<AuthAppState<D, S>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> AuthResult<Response>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let orchestrator = &state.orchestrator;
    let presented = extract_cookie(&headers, &orchestrator.config().refresh_cookie_name)
        .ok_or(AuthError::MissingRefreshToken)?;

    let session = orchestrator
        .refresh(&req.user_id, &presented, orchestrator.deadline())
        .await?;

    token_response(orchestrator, session)
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
///
/// The refresh cookie must match the active session.
pub async fn sign_out<D, S>(
    State(state): State<AuthAppState<D, S>>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<SignOutRequest>,
) -> AuthResult<impl IntoResponse>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let orchestrator = &state.orchestrator;
    let presented = extract_cookie(&headers, &orchestrator.config().refresh_cookie_name)
        .ok_or(AuthError::MissingRefreshToken)?;

    orchestrator
        .sign_out(&req.user_id, &presented, orchestrator.deadline())
        .await?;

    let cookie = orchestrator.config().refresh_cookie(None).build_delete_cookie();

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignOutResponse { success: true }),
    ))
}

// ============================================================================
// Privilege
// ============================================================================

/// GET /api/auth/is-admin/{userId}
pub async fn is_admin<D, S>(
    State(state): State<AuthAppState<D, S>>,
    Path(user_id): Path<UserId>,
) -> AuthResult<Json<IsAdminResponse>>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let orchestrator = &state.orchestrator;
    let is_admin = orchestrator
        .is_admin(&user_id, orchestrator.deadline())
        .await?;

    Ok(Json(IsAdminResponse { is_admin }))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me (behind `require_access_token`)
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> Json<MeResponse> {
    let claims = user.claims;
    Json(MeResponse {
        user_id: claims.user_id,
        user_name: claims.username,
        email: claims.email,
        role: claims.role.to_string(),
        expires_at: claims.exp,
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Access token in the body and `Authorization` header, refresh token in
/// the cookie
fn token_response<D, S>(
    orchestrator: &SessionOrchestrator<D, S>,
    session: IssuedSession,
) -> AuthResult<Response>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let cookie = orchestrator
        .config()
        .refresh_cookie(Some(session.refresh_ttl.as_secs()))
        .build_set_cookie(&session.tokens.refresh_token);
    let cookie = to_header_value(&cookie)
        .ok_or_else(|| AuthError::Internal("refresh cookie is not a valid header".to_string()))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", session.tokens.access_token))
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);
    headers.insert(header::AUTHORIZATION, bearer);

    let body = TokenResponse {
        user_id: session.identity.id,
        access_token: session.tokens.access_token,
        token_type: "Bearer",
        expires_in: session.access_ttl.as_secs(),
    };

    Ok((StatusCode::OK, headers, Json(body)).into_response())
}
