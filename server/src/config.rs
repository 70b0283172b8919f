// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Server configuration, read from the environment.
//!
//! - `HOST`: address to bind to (default: `0.0.0.0`)
//! - `PORT`: port to bind to (default: `3000`)
//! - `DATABASE_URL`: SQLite connection string (default: `sqlite://database/taskflow.db`)
//! - `SESSION_SECRET`: key material for signing session cookies (required)
//! - `SESSION_TTL_SECS`: lifetime of a login session (default: 7 days)
use crate::sessions::DEFAULT_SESSION_TTL;

use anyhow::{Context, Result, bail};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://database/taskflow.db";

/// Shortest secret accepted for deriving the cookie signing key.
pub const SESSION_SECRET_MIN_LEN: usize = 32;

/// Log filter used when `RUST_LOG` is not set. `server` is the library
/// target, `taskflow` the binary.
pub const DEFAULT_LOG_FILTER: &str = "server=debug,taskflow=debug,tower_http=info";

/// Rejects secrets too short to derive the cookie signing key from.
pub fn validate_session_secret(secret: &str) -> Result<()> {
    if secret.len() < SESSION_SECRET_MIN_LEN {
        bail!(
            "SESSION_SECRET must be at least {} bytes long",
            SESSION_SECRET_MIN_LEN
        );
    }
    Ok(())
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl: Duration,
}

impl Config {
    /// Loads the configuration from the process environment, reading a
    /// `.env` file first when one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let session_secret = lookup("SESSION_SECRET")
            .context("SESSION_SECRET environment variable is required")?;
        validate_session_secret(&session_secret)?;

        let session_ttl = match lookup("SESSION_TTL_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().with_context(|| {
                    format!("SESSION_TTL_SECS must be a number of seconds, got {:?}", raw)
                })?;
                if secs == 0 {
                    bail!("SESSION_TTL_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_SESSION_TTL,
        };

        Ok(Self {
            host,
            port,
            database_url,
            session_secret,
            session_ttl,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

// Hand-written so the secret never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("session_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = Config::from_lookup(lookup_from(&[("SESSION_SECRET", SECRET)])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_explicit_values_win() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("SESSION_SECRET", SECRET),
            ("SESSION_TTL_SECS", "3600"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:8081".parse().unwrap()
        );
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn test_short_secret_is_an_error() {
        let err =
            Config::from_lookup(lookup_from(&[("SESSION_SECRET", "too-short")])).unwrap_err();
        assert!(err.to_string().contains("at least 32 bytes"));
        assert!(validate_session_secret(SECRET).is_ok());
    }

    #[test]
    fn test_zero_session_ttl_is_an_error() {
        for ttl in ["0", "soon"] {
            let result = Config::from_lookup(lookup_from(&[
                ("SESSION_SECRET", SECRET),
                ("SESSION_TTL_SECS", ttl),
            ]));
            assert!(result.is_err(), "accepted SESSION_TTL_SECS={}", ttl);
        }
    }

    #[test]
    fn test_default_log_filter_names_this_crate() {
        let targets: Vec<&str> = DEFAULT_LOG_FILTER
            .split(',')
            .filter_map(|directive| directive.split('=').next())
            .collect();
        assert!(targets.contains(&env!("CARGO_CRATE_NAME")));
        assert!(targets.contains(&"tower_http"));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[
            ("PORT", "http"),
            ("SESSION_SECRET", SECRET),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_lookup(lookup_from(&[("SESSION_SECRET", SECRET)])).unwrap();
        assert!(!format!("{:?}", config).contains(SECRET));
    }
}
