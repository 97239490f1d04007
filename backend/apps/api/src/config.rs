//! Process Configuration
//!
//! Read once at startup from the environment (after `.env`). Library crates
//! only see the `AuthConfig` and `ShopConfig` built here.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use auth::AuthConfig;
use kernel::hypermedia::BaseUrl;
use shop::ShopConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Secrets given as `base64:<data>` are decoded; anything else is taken as
/// raw bytes.
const BASE64_PREFIX: &str = "base64:";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    /// `None` runs on in-memory storage
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub upload_dir: PathBuf,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub shop: ShopConfig,
}

impl ApiConfig {
    /// Load from the process environment. Debug builds tolerate a missing
    /// `JWT_KEY` by generating one.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), cfg!(debug_assertions))
    }

    pub fn from_lookup<F>(get: F, allow_random_secret: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let host = parse_or(&get, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or(&get, "PORT", DEFAULT_PORT)?;
        let base_url = BaseUrl::new(
            get("BASE_URL").unwrap_or_else(|| format!("http://localhost:{port}")),
        );

        let token_secret = match get("JWT_KEY") {
            Some(raw) => secret_bytes(&raw).context("JWT_KEY")?,
            None if allow_random_secret => {
                tracing::warn!("JWT_KEY not set; using a random key, tokens will not survive a restart");
                platform::crypto::random_bytes(32)
            }
            None => bail!("JWT_KEY must be set"),
        };

        let password_pepper = get("PASSWORD_PEPPER")
            .map(|raw| secret_bytes(&raw))
            .transpose()
            .context("PASSWORD_PEPPER")?;

        let strict_auth = flag_or(&get, "STRICT_AUTH", true)?;

        let auth = AuthConfig {
            token_secret,
            token_ttl: chrono_secs(parse_or(
                &get,
                "TOKEN_TTL_SECS",
                AuthConfig::default().token_ttl.num_seconds(),
            )?)?,
            password_pepper,
            accept_body_token: flag_or(&get, "ACCEPT_BODY_TOKEN", false)?,
            strict_auth,
            base_url: base_url.clone(),
            ..AuthConfig::default()
        };

        let shop = ShopConfig {
            base_url,
            max_image_bytes: parse_or(
                &get,
                "MAX_IMAGE_BYTES",
                ShopConfig::default().max_image_bytes,
            )?,
            strict_auth,
            ..ShopConfig::default()
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            frontend_origins,
            auth,
            shop,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key}={raw}: {e}")),
        None => Ok(default),
    }
}

/// `true`/`false`, also `yes`/`no`, `on`/`off`, `1`/`0`
fn flag_or<G>(get: &G, key: &str, default: bool) -> anyhow::Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => bail!("{key}={raw} is not a boolean"),
    }
}

fn secret_bytes(raw: &str) -> anyhow::Result<Vec<u8>> {
    match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => platform::crypto::from_base64(encoded).context("invalid base64"),
        None => Ok(raw.as_bytes().to_vec()),
    }
}

fn chrono_secs(secs: i64) -> anyhow::Result<chrono::Duration> {
    if secs <= 0 {
        bail!("TOKEN_TTL_SECS must be positive");
    }
    chrono::Duration::try_seconds(secs).context("TOKEN_TTL_SECS out of range")
}
