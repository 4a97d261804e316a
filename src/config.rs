//! Environment-driven configuration, loaded once at startup and passed
//! explicitly to the components that need it.

use humantime_serde::re::humantime;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::telegram::ChatId;
use crate::telegram::client::DEFAULT_API_URL;
use crate::utils::probe::{DEFAULT_PROBE_PROGRAM, DEFAULT_PROBE_TIMEOUT};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while reading configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} not specified in env")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API token (`BOT_TOKEN`).
    pub bot_token: String,
    /// Logging channel that mirrors playback events (`LOGGER_ID`, `0` disables it).
    pub logger_id: ChatId,
    /// Bot API base URL (`TELEGRAM_API_URL`).
    pub api_url: Url,
    /// HTTP timeout for Bot API calls (`REQUEST_TIMEOUT`).
    pub request_timeout: Duration,
    /// Path or name of the ffprobe executable (`FFPROBE_PATH`).
    pub ffprobe_path: PathBuf,
    /// Upper bound on a single ffprobe run (`FFPROBE_TIMEOUT`).
    pub ffprobe_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let logger_id = get("LOGGER_ID")
            .map(|value| ChatId::from(value.as_str()))
            .unwrap_or_default();

        let api_url = match get("TELEGRAM_API_URL") {
            Some(value) => Url::parse(&value).map_err(|e| ConfigError::Invalid {
                var: "TELEGRAM_API_URL",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => Url::parse(DEFAULT_API_URL).map_err(|e| ConfigError::Invalid {
                var: "TELEGRAM_API_URL",
                value: DEFAULT_API_URL.to_string(),
                reason: e.to_string(),
            })?,
        };

        let request_timeout =
            parse_duration("REQUEST_TIMEOUT", get("REQUEST_TIMEOUT"), DEFAULT_REQUEST_TIMEOUT)?;
        let ffprobe_timeout =
            parse_duration("FFPROBE_TIMEOUT", get("FFPROBE_TIMEOUT"), DEFAULT_PROBE_TIMEOUT)?;

        let ffprobe_path = get("FFPROBE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROBE_PROGRAM));

        let config = Self {
            bot_token,
            logger_id,
            api_url,
            request_timeout,
            ffprobe_path,
            ffprobe_timeout,
        };

        if config.logger_id.is_unset() {
            info!("LOGGER_ID not set, playback logging is disabled");
        } else {
            debug!("Playback events will be logged to {}", config.logger_id);
        }

        Ok(config)
    }
}

fn parse_duration(
    var: &'static str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => humantime::parse_duration(value.trim()).map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
