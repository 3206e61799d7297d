//! Server configuration from environment variables

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth_session::AuthConfig;
use auth_session::config::SameSite;
use auth_session::models::{RoleFamily, TokenProfile, TokenProfiles, TokenSecret};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";
const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryBackend {
    Postgres,
    Memory,
}

pub struct Settings {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub directory: DirectoryBackend,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub password_pepper: Option<Vec<u8>>,
    pub auth: AuthConfig,
    pub profiles: TokenProfiles,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    /// `AUTH_INSECURE_DEV_SECRETS` (on by default in debug builds) allows
    /// random token secrets when `DEFAULT_*` ones are not configured
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let store = match get("AUTH_STORE").as_deref().unwrap_or("redis") {
            "redis" => StoreBackend::Redis,
            "memory" => StoreBackend::Memory,
            other => bail!("AUTH_STORE must be 'redis' or 'memory', got '{other}'"),
        };
        let directory = match get("AUTH_DIRECTORY").as_deref().unwrap_or("postgres") {
            "postgres" => DirectoryBackend::Postgres,
            "memory" => DirectoryBackend::Memory,
            other => bail!("AUTH_DIRECTORY must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = get("DATABASE_URL");
        if directory == DirectoryBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when AUTH_DIRECTORY=postgres");
        }
        let redis_url = get("REDIS_URL");
        if store == StoreBackend::Redis && redis_url.is_none() {
            bail!("REDIS_URL must be set when AUTH_STORE=redis");
        }

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let insecure_defaults = get("AUTH_INSECURE_DEV_SECRETS")
            .map(|v| parse_bool(&v))
            .transpose()?
            .unwrap_or(cfg!(debug_assertions));

        let mut auth = AuthConfig::default();
        if let Some(secure) = get("COOKIE_SECURE") {
            auth.cookie_secure = parse_bool(&secure).context("COOKIE_SECURE")?;
        }
        if let Some(same_site) = get("COOKIE_SAME_SITE") {
            auth.cookie_same_site = SameSite::parse(&same_site)
                .with_context(|| format!("COOKIE_SAME_SITE: unknown policy '{same_site}'"))?;
        }
        auth.cookie_domain = get("COOKIE_DOMAIN");
        if let Some(ms) = get("CALL_TIMEOUT_MS") {
            let ms: u64 = ms.trim().parse().context("CALL_TIMEOUT_MS must be milliseconds")?;
            auth.call_timeout = Duration::from_millis(ms);
        }

        Ok(Self {
            bind_addr,
            store,
            directory,
            database_url,
            redis_url,
            frontend_origins,
            password_pepper: get("PASSWORD_PEPPER").map(String::into_bytes),
            auth,
            profiles: load_profiles(&get, insecure_defaults)?,
        })
    }
}

/// `DEFAULT_*` is required (unless insecure defaults are allowed);
/// `CUSTOMER_*` and `SELLER_*` fall back to it when unset.
fn load_profiles(
    get: &impl Fn(&str) -> Option<String>,
    insecure_defaults: bool,
) -> anyhow::Result<TokenProfiles> {
    let default = match load_profile(get, "DEFAULT")? {
        Some(profile) => profile,
        None if insecure_defaults => {
            tracing::warn!("DEFAULT token secrets not set, using random development secrets");
            TokenProfile::random(
                ttl_or(get, "DEFAULT_ACCESS_TOKEN_TTL", DEFAULT_ACCESS_TTL)?,
                ttl_or(get, "DEFAULT_REFRESH_TOKEN_TTL", DEFAULT_REFRESH_TTL)?,
            )
        }
        None => bail!("DEFAULT_ACCESS_TOKEN_SECRET and DEFAULT_REFRESH_TOKEN_SECRET must be set"),
    };

    let mut profiles = TokenProfiles::new(default);
    for (prefix, family) in [
        ("CUSTOMER", RoleFamily::Customer),
        ("SELLER", RoleFamily::Seller),
    ] {
        if let Some(profile) = load_profile(get, prefix)? {
            profiles = profiles.with_profile(family, profile);
        }
    }
    Ok(profiles)
}

fn load_profile(
    get: &impl Fn(&str) -> Option<String>,
    prefix: &str,
) -> anyhow::Result<Option<TokenProfile>> {
    let access = get(&format!("{prefix}_ACCESS_TOKEN_SECRET"));
    let refresh = get(&format!("{prefix}_REFRESH_TOKEN_SECRET"));

    let (access, refresh) = match (access, refresh) {
        (None, None) => return Ok(None),
        (Some(access), Some(refresh)) => (access, refresh),
        _ => bail!("{prefix}_ACCESS_TOKEN_SECRET and {prefix}_REFRESH_TOKEN_SECRET must be set together"),
    };

    let profile = TokenProfile::new(
        TokenSecret::new(access.into_bytes())
            .with_context(|| format!("{prefix}_ACCESS_TOKEN_SECRET"))?,
        ttl_or(get, &format!("{prefix}_ACCESS_TOKEN_TTL"), DEFAULT_ACCESS_TTL)?,
        TokenSecret::new(refresh.into_bytes())
            .with_context(|| format!("{prefix}_REFRESH_TOKEN_SECRET"))?,
        ttl_or(get, &format!("{prefix}_REFRESH_TOKEN_TTL"), DEFAULT_REFRESH_TTL)?,
    )
    .with_context(|| format!("{prefix} token profile"))?;

    Ok(Some(profile))
}

fn ttl_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    match get(key) {
        Some(value) => parse_ttl(&value).with_context(|| format!("{key} is not a valid duration")),
        None => Ok(default),
    }
}

/// Seconds, or a number suffixed with `s`, `m`, `h` or `d`
pub fn parse_ttl(value: &str) -> anyhow::Result<Duration> {
    let value = value.trim();
    let (number, unit) = match value.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&value[..i], c.to_ascii_lowercase()),
        _ => (value, 's'),
    };
    let amount: u64 = number
        .trim()
        .parse()
        .with_context(|| format!("invalid duration '{value}'"))?;
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86_400,
        other => bail!("unknown duration unit '{other}'"),
    };
    if amount == 0 {
        bail!("duration must be positive");
    }
    amount
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .context("duration overflow")
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{other}'"),
    }
}
