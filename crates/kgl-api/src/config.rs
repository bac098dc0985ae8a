//! Service configuration.
//!
//! Read once at startup from environment variables. A missing required
//! variable is fatal.

use zeroize::Zeroizing;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for the HTTP service.
///
/// Custom `Debug` implementation redacts the database URI and the JWT
/// secret to prevent credential leakage in log output.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_uri: Zeroizing<String>,
    /// Shared HMAC secret used to verify bearer tokens.
    pub jwt_secret: Zeroizing<String>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_uri", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DATABASE_URI` (required)
    /// - `JWT_SECRET` (required)
    /// - `PORT` (default: 3000)
    /// - `KGL_LOG_FORMAT` (`text` or `json`, default: `text`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_uri = required(&lookup, "DATABASE_URI")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup("KGL_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };

        Ok(Self {
            port,
            database_uri: Zeroizing::new(database_uri),
            jwt_secret: Zeroizing::new(jwt_secret),
            log_format,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),
    #[error("invalid KGL_LOG_FORMAT value {0:?} (expected \"text\" or \"json\")")]
    InvalidLogFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URI", "postgres://localhost/kgl"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.jwt_secret.as_str(), "s3cret");
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URI", "postgres://localhost/kgl")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn empty_database_uri_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URI", ""), ("JWT_SECRET", "x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URI")));
    }

    #[test]
    fn port_and_format_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URI", "postgres://localhost/kgl"),
            ("JWT_SECRET", "x"),
            ("PORT", "8081"),
            ("KGL_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URI", "postgres://localhost/kgl"),
            ("JWT_SECRET", "x"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URI", "postgres://user:hunter2@db/kgl"),
            ("JWT_SECRET", "very-secret"),
        ]))
        .unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
