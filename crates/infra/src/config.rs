//! Configuration loading and representation.
//!
//! Three settings: connection string, database name and one timeout (seconds)
//! applied to connection establishment and to every repository call.
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `MONGO_URL` | connection string | required |
//! | `MONGO_DB` | database name | required |
//! | `MONGO_TIMEOUT` | timeout in whole seconds (> 0) | `10` |

use std::time::Duration;

use thiserror::Error;

pub const ENV_URL: &str = "MONGO_URL";
pub const ENV_DATABASE: &str = "MONGO_DB";
pub const ENV_TIMEOUT: &str = "MONGO_TIMEOUT";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid {name}: {value:?} (expected a positive number of seconds)")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Document store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub url: String,
    pub database: String,
    pub timeout: Duration,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (environment, file, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let url = non_blank(ENV_URL).ok_or(ConfigError::Missing(ENV_URL))?;
        let database = non_blank(ENV_DATABASE).ok_or(ConfigError::Missing(ENV_DATABASE))?;
        let timeout_secs = match non_blank(ENV_TIMEOUT) {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: ENV_TIMEOUT,
                        value: raw,
                    });
                }
            },
        };

        Ok(Self::new(url, database, timeout_secs))
    }
}
