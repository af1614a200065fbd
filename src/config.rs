//! Service configuration, read once from the environment at startup.
//!
//! Connection settings accept either a full URL or its parts:
//!
//! ```bash
//! # full URLs
//! export DATABASE_URL="postgres://links:secret@db:5432/links"
//! export REDIS_URL="redis://cache:6379/0"
//!
//! # or parts
//! export DB_HOST=db DB_PORT=5432 DB_USER=links DB_PASSWORD=secret DB_NAME=links
//! export REDIS_HOST=cache REDIS_PORT=6379 REDIS_PASSWORD= REDIS_DB=0
//! ```
//!
//! | Variable | Default |
//! |---|---|
//! | `CACHE_BACKEND` (`redis`, `memory`, `none`) | `redis` if Redis is configured, else `none` |
//! | `LISTEN` | `0.0.0.0:3000` |
//! | `BASE_URL` | `http://localhost:3000` |
//! | `RUST_LOG` | `info` |
//! | `LOG_FORMAT` (`text`, `json`) | `text` |
//! | `LINK_TTL_SECONDS` | `86400` |
//! | `MAX_CODE_ATTEMPTS` (1..=20) | `5` |
//! | `REQUEST_TIMEOUT_SECONDS` | `10` |
//! | `PURGE_INTERVAL_SECONDS` (`0` disables) | `3600` |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_CONNECT_TIMEOUT` | `30` |
//! | `DB_IDLE_TIMEOUT` | `600` |
//! | `DB_MAX_LIFETIME` | `1800` |
//!
//! `.env` files are loaded by the binaries before calling [`load_from_env`].

use anyhow::{Context, Result, ensure};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::application::services::LinkPolicy;

/// Which cache backend fronts the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    None,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            "none" | "off" | "disabled" => Ok(Self::None),
            other => anyhow::bail!("unknown CACHE_BACKEND '{other}' (expected redis, memory or none)"),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Redis => "redis",
            Self::Memory => "memory",
            Self::None => "none",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub cache_backend: CacheBackend,
    pub listen_addr: String,
    pub base_url: String,
    pub log_level: String,
    pub log_format: String,
    /// Fixed lifetime of newly created links, in seconds.
    pub link_ttl_seconds: u64,
    /// Candidate codes tried per create request before giving up on collisions.
    pub max_code_attempts: u32,
    pub request_timeout_seconds: u64,
    /// Period of the expired-link purge worker; `0` disables it.
    pub purge_interval_seconds: u64,
    pub db_max_connections: u32,
    /// Pool acquire timeout in seconds.
    pub db_connect_timeout: u64,
    pub db_idle_timeout: u64,
    pub db_max_lifetime: u64,
}

/// Ten years; keeps `expires_at` arithmetic far from chrono's limits.
const MAX_LINK_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Non-empty value of `key`, if set.
fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

/// Parsed value of `key`, or `default` when unset. A value that does not
/// parse is an error rather than a silent fallback.
fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{key}='{raw}' is invalid: {e}")),
        None => Ok(default),
    }
}

impl Config {
    /// Reads configuration without validating it.
    ///
    /// # Errors
    ///
    /// Fails when no database is configured or a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => postgres_url_from_parts().context("no database configured")?,
        };
        let redis_url = var("REDIS_URL").or_else(redis_url_from_parts);

        let cache_backend = match var("CACHE_BACKEND") {
            Some(raw) => raw.parse()?,
            None if redis_url.is_some() => CacheBackend::Redis,
            None => CacheBackend::None,
        };

        Ok(Self {
            database_url,
            redis_url,
            cache_backend,
            listen_addr: var_or("LISTEN", "0.0.0.0:3000"),
            base_url: var_or("BASE_URL", "http://localhost:3000"),
            log_level: var_or("RUST_LOG", "info"),
            log_format: var_or("LOG_FORMAT", "text"),
            link_ttl_seconds: parsed_or("LINK_TTL_SECONDS", 86_400)?,
            max_code_attempts: parsed_or("MAX_CODE_ATTEMPTS", 5)?,
            request_timeout_seconds: parsed_or("REQUEST_TIMEOUT_SECONDS", 10)?,
            purge_interval_seconds: parsed_or("PURGE_INTERVAL_SECONDS", 3600)?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
            db_connect_timeout: parsed_or("DB_CONNECT_TIMEOUT", 30)?,
            db_idle_timeout: parsed_or("DB_IDLE_TIMEOUT", 600)?,
            db_max_lifetime: parsed_or("DB_MAX_LIFETIME", 1800)?,
        })
    }

    /// Checks ranges and cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            matches!(self.log_format.as_str(), "text" | "json"),
            "LOG_FORMAT must be text or json, got '{}'",
            self.log_format
        );
        ensure!(
            self.listen_addr.contains(':'),
            "LISTEN must be host:port, got '{}'",
            self.listen_addr
        );
        ensure!(
            has_scheme(&self.base_url, &["http", "https"]),
            "BASE_URL must be an http(s) URL, got '{}'",
            self.base_url
        );
        ensure!(
            has_scheme(&self.database_url, &["postgres", "postgresql"]),
            "DATABASE_URL must be a postgres:// URL, got '{}'",
            mask_connection_string(&self.database_url)
        );

        if let Some(redis_url) = &self.redis_url {
            ensure!(
                has_scheme(redis_url, &["redis", "rediss"]),
                "REDIS_URL must be a redis:// or rediss:// URL, got '{}'",
                mask_connection_string(redis_url)
            );
        }
        ensure!(
            self.cache_backend != CacheBackend::Redis || self.redis_url.is_some(),
            "CACHE_BACKEND=redis needs REDIS_URL or REDIS_HOST"
        );

        ensure!(
            (1..=MAX_LINK_TTL_SECONDS).contains(&self.link_ttl_seconds),
            "LINK_TTL_SECONDS must be in 1..={}, got {}",
            MAX_LINK_TTL_SECONDS,
            self.link_ttl_seconds
        );
        ensure!(
            (1..=20).contains(&self.max_code_attempts),
            "MAX_CODE_ATTEMPTS must be in 1..=20, got {}",
            self.max_code_attempts
        );
        ensure!(
            self.request_timeout_seconds > 0,
            "REQUEST_TIMEOUT_SECONDS must be positive"
        );
        ensure!(self.db_max_connections > 0, "DB_MAX_CONNECTIONS must be positive");
        ensure!(self.db_connect_timeout > 0, "DB_CONNECT_TIMEOUT must be positive");

        Ok(())
    }

    /// Link lifetime and collision policy. Assumes [`validate`](Self::validate) passed.
    pub fn link_policy(&self) -> LinkPolicy {
        LinkPolicy {
            ttl: chrono::Duration::seconds(self.link_ttl_seconds as i64),
            max_attempts: self.max_code_attempts,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Purge period, or `None` when purging is disabled.
    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval_seconds > 0).then(|| Duration::from_secs(self.purge_interval_seconds))
    }

    /// Logs the effective settings with credentials masked.
    pub fn print_summary(&self) {
        let cache = match (&self.cache_backend, &self.redis_url) {
            (CacheBackend::Redis, Some(url)) => format!("redis ({})", mask_connection_string(url)),
            (backend, _) => backend.to_string(),
        };

        tracing::info!(
            listen = %self.listen_addr,
            base_url = %self.base_url,
            database = %mask_connection_string(&self.database_url),
            cache = %cache,
            link_ttl_seconds = self.link_ttl_seconds,
            max_code_attempts = self.max_code_attempts,
            request_timeout_seconds = self.request_timeout_seconds,
            purge_interval_seconds = self.purge_interval_seconds,
            log_format = %self.log_format,
            "Configuration loaded"
        );
    }
}

fn has_scheme(raw: &str, schemes: &[&str]) -> bool {
    Url::parse(raw).is_ok_and(|url| schemes.contains(&url.scheme()))
}

/// Builds a PostgreSQL URL from `DB_*` parts. Host and port default to
/// `localhost:5432`; user, password and name are required.
fn postgres_url_from_parts() -> Result<String> {
    let required =
        |key: &str| var(key).with_context(|| format!("{key} must be set when DATABASE_URL is not"));

    let user = required("DB_USER")?;
    let password = required("DB_PASSWORD")?;
    let name = required("DB_NAME")?;
    let host = var_or("DB_HOST", "localhost");
    let port = var_or("DB_PORT", "5432");

    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}

/// Builds a Redis URL from `REDIS_*` parts, or `None` without `REDIS_HOST`.
/// An empty `REDIS_PASSWORD` means no authentication.
fn redis_url_from_parts() -> Option<String> {
    let host = var("REDIS_HOST")?;
    let port = var_or("REDIS_PORT", "6379");
    let db = var_or("REDIS_DB", "0");

    Some(match var("REDIS_PASSWORD") {
        Some(password) => format!("redis://:{password}@{host}:{port}/{db}"),
        None => format!("redis://{host}:{port}/{db}"),
    })
}

/// Replaces the password of a connection URL with `***` for logging.
///
/// Strings that do not parse as URLs, or carry no password, are returned as is.
pub fn mask_connection_string(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => match url.set_password(Some("***")) {
            Ok(()) => url.to_string(),
            Err(()) => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}

/// Reads and validates configuration.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
