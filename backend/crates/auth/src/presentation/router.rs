//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::SessionOrchestrator;
use crate::domain::repository::{CredentialVerifier, SessionStore, UserDirectory};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_access_token;

/// Auth routes, meant to be nested at `/api/auth`
pub fn auth_router<D, S>(orchestrator: Arc<SessionOrchestrator<D, S>>) -> Router
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let state = AuthAppState { orchestrator };

    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token::<D, S>,
        ));

    Router::new()
        .route("/signup", post(handlers::sign_up::<D, S>))
        .route("/signin", post(handlers::sign_in::<D, S>))
        .route("/refresh", post(handlers::refresh::<D, S>))
        .route("/signout", post(handlers::sign_out::<D, S>))
        .route("/is-admin/{user_id}", get(handlers::is_admin::<D, S>))
        .merge(protected)
        .with_state(state)
}
