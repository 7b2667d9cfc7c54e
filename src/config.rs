// src/config.rs

use std::{env, str::FromStr};

use dotenvy::dotenv;
use thiserror::Error;

/// What happens when a student saves an attempt that is already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResubmissionPolicy {
    /// Completed attempts are final; further saves fail with 409.
    Reject,
    /// A new final submission re-grades the attempt.
    Overwrite,
}

impl FromStr for ResubmissionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(ResubmissionPolicy::Reject),
            "overwrite" => Ok(ResubmissionPolicy::Overwrite),
            other => Err(ConfigError::Invalid {
                key: "ATTEMPT_RESUBMISSION",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub port: u16,
    pub log_dir: String,
    pub resubmission: ResubmissionPolicy,
    /// How many times a conflicting attempt save is re-read and retried.
    pub attempt_save_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let port = parsed("PORT", 3000)?;
        let attempt_save_retries = parsed("ATTEMPT_SAVE_RETRIES", 3)?;
        let resubmission = match env::var("ATTEMPT_RESUBMISSION") {
            Ok(value) => value.parse()?,
            Err(_) => ResubmissionPolicy::Reject,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            port,
            log_dir,
            resubmission,
            attempt_save_retries,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
