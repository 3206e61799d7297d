//! API Server Entry Point
//!
//! Uses `anyhow` for startup errors; request-level errors go through
//! `auth_session::AuthError` and the kernel `AppError` body.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth_session::clock::{Clock, SystemClock};
use auth_session::domain::{CredentialVerifier, SessionStore, UserDirectory};
use auth_session::error::TOKEN_EXPIRED_HEADER;
use auth_session::{
    InMemorySessionStore, InMemoryUserDirectory, PgUserDirectory, RedisSessionStore,
    SessionOrchestrator, TokenIssuer, auth_router,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{DirectoryBackend, Settings, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_api=info,auth_session=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match settings.store {
        StoreBackend::Redis => {
            let url = settings.redis_url.as_deref().context("REDIS_URL is not set")?;
            let store = RedisSessionStore::connect(url, settings.auth.session_key_prefix.clone())
                .await
                .context("failed to connect to redis")?;
            tracing::info!("Connected to redis");
            with_directory(settings, store, clock).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory session store, sessions are lost on restart");
            let store = InMemorySessionStore::new(clock.clone());
            with_directory(settings, store, clock).await
        }
    }
}

async fn with_directory<S>(settings: Settings, store: S, clock: Arc<dyn Clock>) -> anyhow::Result<()>
where
    S: SessionStore + Send + Sync + 'static,
{
    match settings.directory {
        DirectoryBackend::Postgres => {
            let url = settings
                .database_url
                .as_deref()
                .context("DATABASE_URL is not set")?;
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;
            tracing::info!("Migrations completed");

            let mut directory = PgUserDirectory::new(pool);
            if let Some(pepper) = settings.password_pepper.clone() {
                directory = directory.with_pepper(pepper);
            }
            serve(settings, directory, store, clock).await
        }
        DirectoryBackend::Memory => {
            tracing::warn!("Using in-memory user directory, accounts are lost on restart");
            let directory = match settings.password_pepper.clone() {
                Some(pepper) => InMemoryUserDirectory::with_pepper(pepper),
                None => InMemoryUserDirectory::new(),
            };
            serve(settings, directory, store, clock).await
        }
    }
}

async fn serve<D, S>(
    settings: Settings,
    directory: D,
    store: S,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<()>
where
    D: UserDirectory + CredentialVerifier + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let Settings {
        bind_addr,
        frontend_origins,
        auth,
        profiles,
        ..
    } = settings;

    for (family, profile) in profiles.families() {
        tracing::info!(
            family = %family,
            access_ttl_secs = profile.access_ttl.as_secs(),
            refresh_ttl_secs = profile.refresh_ttl.as_secs(),
            "Token profile loaded"
        );
    }

    let issuer = Arc::new(TokenIssuer::new(Arc::new(profiles), clock));
    let orchestrator = Arc::new(SessionOrchestrator::new(
        Arc::new(directory),
        Arc::new(store),
        issuer,
        Arc::new(auth),
    ));

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .expose_headers([
            header::AUTHORIZATION,
            http::HeaderName::from_static(TOKEN_EXPIRED_HEADER),
        ])
        .allow_credentials(true);

    let app = Router::new()
        .nest("/api/auth", auth_router(orchestrator))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!("Listening on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
