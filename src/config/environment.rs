// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! Environment-based configuration management
//!
//! All runtime knobs come from environment variables; nothing is read from
//! ambient globals after startup. The signing secret and store location are
//! injected into the token issuer and database at construction.

use crate::constants::limits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from a connection string
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Self::Memory
            } else {
                Self::SQLite {
                    path: PathBuf::from(path_str),
                }
            }
        } else {
            // Treat a bare string as a SQLite file path
            Self::SQLite {
                path: PathBuf::from(s),
            }
        }
    }

    /// Convert to a connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Where the account store lives
    pub url: DatabaseUrl,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Process-wide token signing secret; generated at startup when unset
    pub jwt_secret: Option<String>,
    /// Access token lifetime in minutes
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in hours
    pub refresh_token_expiry_hours: i64,
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse
    pub fn from_env() -> Result<Self> {
        let http_port = parse_env_or("HTTP_PORT", limits::DEFAULT_HTTP_PORT)?;

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/mms.db".into());

        let access_token_expiry_mins = parse_env_or(
            "ACCESS_TOKEN_EXPIRY_MINS",
            limits::DEFAULT_ACCESS_TOKEN_EXPIRY_MINS,
        )?;
        let refresh_token_expiry_hours = parse_env_or(
            "REFRESH_TOKEN_EXPIRY_HOURS",
            limits::DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS,
        )?;

        Ok(Self {
            http_port,
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&database_url),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET").ok(),
                access_token_expiry_mins,
                refresh_token_expiry_hours,
            },
        })
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} access_expiry={}m refresh_expiry={}h secret={}",
            self.http_port,
            self.database.url.to_connection_string(),
            self.auth.access_token_expiry_mins,
            self.auth.refresh_token_expiry_hours,
            if self.auth.jwt_secret.is_some() {
                "from environment"
            } else {
                "generated"
            }
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: limits::DEFAULT_HTTP_PORT,
            database: DatabaseConfig {
                url: DatabaseUrl::Memory,
            },
            auth: AuthConfig {
                jwt_secret: None,
                access_token_expiry_mins: limits::DEFAULT_ACCESS_TOKEN_EXPIRY_MINS,
                refresh_token_expiry_hours: limits::DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS,
            },
        }
    }
}

/// Parse an environment variable, falling back to a default when unset
fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid value for {name}: {value}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert!(matches!(
            DatabaseUrl::parse_url("sqlite::memory:"),
            DatabaseUrl::Memory
        ));
        assert!(matches!(
            DatabaseUrl::parse_url("sqlite:data/mms.db"),
            DatabaseUrl::SQLite { .. }
        ));
        assert_eq!(
            DatabaseUrl::parse_url("data/mms.db").to_connection_string(),
            "sqlite:data/mms.db"
        );
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_port, limits::DEFAULT_HTTP_PORT);
        assert!(config.auth.jwt_secret.is_none());
    }
}
