// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BIND_ADDRESS` | Server bind address | `0.0.0.0:8090` |
//! | `ISSUER_URI` | Token issuer; the JWKS URL is derived from it | `http://keycloak:8080/realms/service-app-realm` |
//! | `JWKS_FETCH_TIMEOUT_SECONDS` | Timeout of one JWKS request (1-60) | `5` |
//! | `JWT_CLOCK_SKEW_SECONDS` | Leeway for `exp`/`nbf` (0-300) | `0` |
//! | `MEMBER_DB_PATH` | redb file holding members | `data/members.redb` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,member_service=debug,tower_http=debug` |

use std::{collections::HashMap, env, path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8090";

pub const DEFAULT_ISSUER_URI: &str = "http://keycloak:8080/realms/service-app-realm";

pub const DEFAULT_JWKS_FETCH_TIMEOUT_SECONDS: u64 = 5;

/// Upper bound for `JWKS_FETCH_TIMEOUT_SECONDS`.
pub const MAX_JWKS_FETCH_TIMEOUT_SECONDS: u64 = 60;

/// Upper bound for `JWT_CLOCK_SKEW_SECONDS`.
pub const MAX_CLOCK_SKEW_SECONDS: u64 = 300;

pub const DEFAULT_MEMBER_DB_PATH: &str = "data/members.redb";

pub const DEFAULT_LOG_FILTER: &str = "info,member_service=debug,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,

    /// Issuer URI exactly as configured; trailing slashes are trimmed only
    /// when the JWKS URL is derived.
    pub issuer_uri: String,

    pub jwks_fetch_timeout: Duration,

    /// Leeway in seconds applied to `exp` and `nbf`.
    pub jwt_clock_skew_seconds: u64,

    pub member_db_path: PathBuf,

    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid issuer URI: {0}")]
    InvalidIssuerUri(String),

    #[error("Invalid JWKS fetch timeout configuration: {0}")]
    InvalidJwksFetchTimeout(String),

    #[error("Invalid JWT clock skew configuration: {0}")]
    InvalidJwtClockSkew(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let issuer_uri = vars
            .get("ISSUER_URI")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ISSUER_URI.to_string());
        Url::parse(&issuer_uri)
            .map_err(|e| ConfigError::InvalidIssuerUri(format!("'{issuer_uri}': {e}")))?;

        let jwks_fetch_timeout = match vars.get("JWKS_FETCH_TIMEOUT_SECONDS") {
            Some(value_str) => {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidJwksFetchTimeout(format!(
                        "JWKS_FETCH_TIMEOUT_SECONDS must be a valid positive integer, got '{value_str}': {e}"
                    ))
                })?;
                if value == 0 || value > MAX_JWKS_FETCH_TIMEOUT_SECONDS {
                    return Err(ConfigError::InvalidJwksFetchTimeout(format!(
                        "JWKS_FETCH_TIMEOUT_SECONDS must be between 1 and {MAX_JWKS_FETCH_TIMEOUT_SECONDS}, got {value}"
                    )));
                }
                Duration::from_secs(value)
            }
            None => Duration::from_secs(DEFAULT_JWKS_FETCH_TIMEOUT_SECONDS),
        };

        let jwt_clock_skew_seconds = match vars.get("JWT_CLOCK_SKEW_SECONDS") {
            Some(value_str) => {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidJwtClockSkew(format!(
                        "JWT_CLOCK_SKEW_SECONDS must be a valid non-negative integer, got '{value_str}': {e}"
                    ))
                })?;
                if value > MAX_CLOCK_SKEW_SECONDS {
                    return Err(ConfigError::InvalidJwtClockSkew(format!(
                        "JWT_CLOCK_SKEW_SECONDS must not exceed {MAX_CLOCK_SKEW_SECONDS} seconds, got {value}"
                    )));
                }
                value
            }
            None => 0,
        };

        let member_db_path = vars
            .get("MEMBER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMBER_DB_PATH));

        let log_format = match vars.get("LOG_FORMAT").map(|s| s.to_ascii_lowercase()) {
            None => LogFormat::default(),
            Some(format) if format == "json" => LogFormat::Json,
            Some(format) if format == "pretty" => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::InvalidLogFormat(format!(
                    "LOG_FORMAT must be 'json' or 'pretty', got '{other}'"
                )))
            }
        };

        Ok(Self {
            bind_address,
            issuer_uri,
            jwks_fetch_timeout,
            jwt_clock_skew_seconds,
            member_db_path,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_vars(&HashMap::new()).unwrap();

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.issuer_uri, DEFAULT_ISSUER_URI);
        assert_eq!(config.jwks_fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.jwt_clock_skew_seconds, 0);
        assert_eq!(config.member_db_path, PathBuf::from(DEFAULT_MEMBER_DB_PATH));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_vars(&vars(&[
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("ISSUER_URI", "https://sso.example.com/realms/members/"),
            ("JWKS_FETCH_TIMEOUT_SECONDS", "10"),
            ("JWT_CLOCK_SKEW_SECONDS", "30"),
            ("MEMBER_DB_PATH", "/tmp/members.redb"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.issuer_uri, "https://sso.example.com/realms/members/");
        assert_eq!(config.jwks_fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.jwt_clock_skew_seconds, 30);
        assert_eq!(config.member_db_path, PathBuf::from("/tmp/members.redb"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_unparseable_issuer() {
        let result = Config::from_vars(&vars(&[("ISSUER_URI", "not a url")]));
        assert!(matches!(result, Err(ConfigError::InvalidIssuerUri(_))));
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        for value in ["0", "61", "-1", "soon"] {
            let result = Config::from_vars(&vars(&[("JWKS_FETCH_TIMEOUT_SECONDS", value)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidJwksFetchTimeout(_))),
                "{value}"
            );
        }
    }

    #[test]
    fn clock_skew_bounds() {
        assert!(Config::from_vars(&vars(&[("JWT_CLOCK_SKEW_SECONDS", "300")])).is_ok());
        for value in ["301", "-5", "abc"] {
            let result = Config::from_vars(&vars(&[("JWT_CLOCK_SKEW_SECONDS", value)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidJwtClockSkew(_))),
                "{value}"
            );
        }
    }

    #[test]
    fn rejects_unknown_log_format() {
        let result = Config::from_vars(&vars(&[("LOG_FORMAT", "xml")]));
        assert!(matches!(result, Err(ConfigError::InvalidLogFormat(_))));
    }
}
