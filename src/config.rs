//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local runs.

use crate::services::format::NumberLocale;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Structured JSON, one object per line
    #[default]
    Json,
    /// Human-readable single-line output
    Pretty,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file with the health samples served by the in-memory provider
    pub samples_path: PathBuf,
    /// Optional JSON array of repetition records to show alongside metrics
    pub records_path: Option<PathBuf>,
    /// Locale used for displayed numbers
    pub locale: NumberLocale,
    /// When set, re-run the foreground trigger on this interval
    pub foreground_interval: Option<Duration>,
    pub log_format: LogFormat,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            samples_path: PathBuf::from("data/samples.json"),
            records_path: None,
            locale: NumberLocale::EN_US,
            foreground_interval: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let locale = match env::var("FIT_LOCALE") {
            Ok(tag) => tag
                .parse()
                .map_err(|_| ConfigError::Invalid("FIT_LOCALE", tag))?,
            Err(_) => NumberLocale::default(),
        };

        let foreground_interval = match env::var("FIT_FOREGROUND_INTERVAL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("FIT_FOREGROUND_INTERVAL_SECS", raw))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("pretty") => LogFormat::Pretty,
            Ok("json") | Err(_) => LogFormat::Json,
            Ok(other) => return Err(ConfigError::Invalid("LOG_FORMAT", other.to_string())),
        };

        Ok(Self {
            samples_path: env::var("FIT_SAMPLES_PATH")
                .map(PathBuf::from)
                .map_err(|_| ConfigError::Missing("FIT_SAMPLES_PATH"))?,
            records_path: env::var("FIT_RECORDS_PATH").ok().map(PathBuf::from),
            locale,
            foreground_interval,
            log_format,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
