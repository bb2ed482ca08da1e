//! Configuration loading and representation.
//!
//! Values come from the process environment, with a `.env` file filling in
//! keys the environment leaves unset. A missing or empty `JWT_SECRET` is a
//! startup error: there is no built-in fallback secret.

use std::collections::HashMap;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use chrono::Duration;
use thiserror::Error;

use logbook_auth::password::{DEFAULT_COST, MAX_COST, MIN_COST};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Longest accepted token lifetime (100 years).
pub const MAX_TOKEN_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to read .env file: {0}")]
    DotEnv(String),
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    jwt_secret: String,
    pub bcrypt_cost: u32,
    pub token_ttl_secs: Option<u64>,
    pub database_url: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl AppConfig {
    /// Load from the process environment plus `.env` in the working directory
    /// (or a parent), if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_dotenv(iter)?,
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(ConfigError::DotEnv(e.to_string())),
        };
        Self::from_env_and(file)
    }

    /// Load from the process environment plus the dotenv file at `path`.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let iter = dotenvy::from_path_iter(path.as_ref())
            .map_err(|e| ConfigError::DotEnv(e.to_string()))?;
        Self::from_env_and(collect_dotenv(iter)?)
    }

    fn from_env_and(file: HashMap<String, String>) -> Result<Self, ConfigError> {
        // The process environment wins over the file.
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Load using an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => {
                let cost = raw
                    .parse::<u32>()
                    .map_err(|e| ConfigError::invalid("BCRYPT_COST", e.to_string()))?;
                if !(MIN_COST..=MAX_COST).contains(&cost) {
                    return Err(ConfigError::invalid(
                        "BCRYPT_COST",
                        format!("must be within {MIN_COST}..={MAX_COST}"),
                    ));
                }
                cost
            }
            None => DEFAULT_COST,
        };

        let token_ttl_secs = match get("TOKEN_TTL_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid("TOKEN_TTL_SECS", e.to_string()))?;
                if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
                    return Err(ConfigError::invalid(
                        "TOKEN_TTL_SECS",
                        format!("must be within 1..={MAX_TOKEN_TTL_SECS}"),
                    ));
                }
                Some(secs)
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            bcrypt_cost,
            token_ttl_secs,
            database_url: get("DATABASE_URL"),
            log_filter: get("LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Minimal config for tests and embedding: given secret, defaults elsewhere.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: secret.into(),
            bcrypt_cost: DEFAULT_COST,
            token_ttl_secs: None,
            database_url: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    pub fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl_secs.map(|s| Duration::seconds(s as i64))
    }

    /// Resolve `HOST:PORT`. Host names (`localhost`) and bare IPv6
    /// addresses (`::1`) are accepted.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ConfigError::invalid("HOST", e.to_string()))?
            .next()
            .ok_or_else(|| ConfigError::invalid("HOST", format!("{} resolved to no address", self.host)))
    }
}

fn collect_dotenv<I>(iter: I) -> Result<HashMap<String, String>, ConfigError>
where
    I: IntoIterator<Item = dotenvy::Result<(String, String)>>,
{
    iter.into_iter()
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| ConfigError::DotEnv(e.to_string()))
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("log_filter", &self.log_filter)
            .finish()
    }
}
