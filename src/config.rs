//! Server configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Every key has a default, so an empty environment yields a
//! server on `0.0.0.0:5000` talking to `pollapp@localhost/pollapp`.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

/// Top-level server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// PostgreSQL host (`DB_HOST`).
    pub db_host: String,

    /// PostgreSQL port (`DB_PORT`).
    pub db_port: u16,

    /// PostgreSQL user (`DB_USER`).
    pub db_user: String,

    /// PostgreSQL password (`DB_PASS`).
    pub db_password: String,

    /// PostgreSQL database name (`DB_NAME`).
    pub db_name: String,

    /// Maximum number of pooled connections.
    pub db_max_connections: u32,

    /// Seconds to wait for a connection before treating the store as
    /// unreachable.
    pub db_connect_timeout_secs: u64,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is present but not a valid
    /// socket address.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(raw) => raw.parse()?,
            None => defaults.listen_addr,
        };

        Ok(Self {
            listen_addr,
            db_host: lookup("DB_HOST").unwrap_or(defaults.db_host),
            db_port: parse_or(&lookup, "DB_PORT", defaults.db_port),
            db_user: lookup("DB_USER").unwrap_or(defaults.db_user),
            db_password: lookup("DB_PASS").unwrap_or(defaults.db_password),
            db_name: lookup("DB_NAME").unwrap_or(defaults.db_name),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections),
            db_connect_timeout_secs: parse_or(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                defaults.db_connect_timeout_secs,
            ),
            log_json: parse_bool_or(&lookup, "LOG_JSON", defaults.log_json),
        })
    }

    /// Connection options for `sqlx`.
    #[must_use]
    pub fn pg_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
    }

    /// Bound on a single connection attempt.
    #[must_use]
    pub fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs.max(1))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 5000)),
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_user: "pollapp".to_string(),
            db_password: String::new(),
            db_name: "pollapp".to_string(),
            db_max_connections: 10,
            db_connect_timeout_secs: 5,
            log_json: false,
        }
    }
}

// Hand-written so the password never reaches the logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("listen_addr", &self.listen_addr)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .field("db_name", &self.db_name)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_connect_timeout_secs", &self.db_connect_timeout_secs)
            .field("log_json", &self.log_json)
            .finish()
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses `key` as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
