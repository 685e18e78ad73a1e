// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read once from the environment at startup into
//! [`AppConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATABASE_PATH` | SQLite database file | `classroom.sqlite3` |
//! | `CLERK_JWKS_URL` | Clerk JWKS endpoint for JWT verification | Required for production |
//! | `CLERK_ISSUER` | Expected JWT issuer claim | Optional |
//! | `CLERK_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `CLERK_API_URL` | Clerk Backend API base URL | `https://api.clerk.com` |
//! | `CLERK_SECRET_KEY` | Clerk Backend API secret key | Unset uses the in-memory directory |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM certificate chain and private key | Unset serves plain HTTP |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::identity::clerk::DEFAULT_CLERK_API_URL;
use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const CLERK_JWKS_URL_ENV: &str = "CLERK_JWKS_URL";
pub const CLERK_ISSUER_ENV: &str = "CLERK_ISSUER";
pub const CLERK_AUDIENCE_ENV: &str = "CLERK_AUDIENCE";
pub const CLERK_API_URL_ENV: &str = "CLERK_API_URL";
pub const CLERK_SECRET_KEY_ENV: &str = "CLERK_SECRET_KEY";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "classroom.sqlite3";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid port: {value}")]
    InvalidPort { name: &'static str, value: String },

    #[error("invalid bind address {0}")]
    InvalidAddress(String),

    /// Only one of the two TLS variables was set.
    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

/// PEM files for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Settings for the Clerk integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClerkSettings {
    pub jwks_url: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub api_url: String,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub clerk: ClerkSettings,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get(PORT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                name: PORT_ENV,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_path: get(DATABASE_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
                .into(),
            clerk: ClerkSettings {
                jwks_url: get(CLERK_JWKS_URL_ENV),
                issuer: get(CLERK_ISSUER_ENV),
                audience: get(CLERK_AUDIENCE_ENV),
                api_url: get(CLERK_API_URL_ENV).unwrap_or_else(|| DEFAULT_CLERK_API_URL.to_string()),
                secret_key: get(CLERK_SECRET_KEY_ENV),
            },
            tls,
            log_format: LogFormat::parse(get(LOG_FORMAT_ENV).as_deref()),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}
