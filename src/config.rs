//! # Configuration Module
//!
//! Process configuration read once at startup from the environment (after
//! `.env` has been loaded). The resulting value is handed to the bot
//! explicitly; nothing reads the environment after startup.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::localization::FALLBACK_LANGUAGE;
use crate::ocr_config::{OcrConfig, DEFAULT_LANGUAGES};
use crate::scheduler::DeletionDelays;

pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const DEFAULT_LANGUAGE_VAR: &str = "BOT_DEFAULT_LANGUAGE";
pub const OCR_LANGUAGES_VAR: &str = "OCR_LANGUAGES";
pub const OCR_TIMEOUT_VAR: &str = "OCR_TIMEOUT_SECS";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN environment variable is not set; export the bot token from @BotFather")]
    MissingToken,
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub default_language: String,
    pub ocr: OcrConfig,
    pub delays: DeletionDelays,
    pub log_format: LogFormat,
}

// Keeps the token out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("default_language", &self.default_language)
            .field("ocr", &self.ocr)
            .field("delays", &self.delays)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup, e.g. a map in tests
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = read(TOKEN_VAR).ok_or(ConfigError::MissingToken)?;

        let default_language = read(DEFAULT_LANGUAGE_VAR)
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());

        let mut ocr = OcrConfig {
            languages: read(OCR_LANGUAGES_VAR).unwrap_or_else(|| DEFAULT_LANGUAGES.to_string()),
            ..OcrConfig::default()
        };
        if let Some(value) = read(OCR_TIMEOUT_VAR) {
            ocr.recovery.operation_timeout_secs = parse_timeout(&value)?.as_secs();
        }

        let log_format = match read(LOG_FORMAT_VAR) {
            None => LogFormat::default(),
            Some(value) => parse_log_format(&value)?,
        };

        Ok(Self {
            bot_token,
            default_language,
            ocr,
            delays: DeletionDelays::default(),
            log_format,
        })
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: OCR_TIMEOUT_VAR,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    match value.parse::<u64>() {
        Ok(0) => Err(invalid("must be greater than zero")),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(invalid(&e.to_string())),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError::InvalidValue {
            key: LOG_FORMAT_VAR,
            value: value.to_string(),
            reason: "expected \"text\" or \"json\"".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let result = Config::from_lookup(lookup(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingToken);
    }

    #[test]
    fn test_blank_token_is_missing() {
        let result = Config::from_lookup(lookup(&[(TOKEN_VAR, "   ")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingToken);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[(TOKEN_VAR, "123:abc")])).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.default_language, "en");
        assert_eq!(config.ocr.languages, "eng");
        assert_eq!(config.ocr.recovery.operation_timeout_secs, 30);
        assert_eq!(config.delays, DeletionDelays::default());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (TOKEN_VAR, "123:abc"),
            (DEFAULT_LANGUAGE_VAR, "BN"),
            (OCR_LANGUAGES_VAR, "eng+pol"),
            (OCR_TIMEOUT_VAR, "12"),
            (LOG_FORMAT_VAR, "json"),
        ]))
        .unwrap();
        assert_eq!(config.default_language, "bn");
        assert_eq!(config.ocr.languages, "eng+pol");
        assert_eq!(config.ocr.recovery.operation_timeout_secs, 12);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_timeout() {
        let result = Config::from_lookup(lookup(&[(TOKEN_VAR, "t"), (OCR_TIMEOUT_VAR, "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: OCR_TIMEOUT_VAR, .. })
        ));

        let result = Config::from_lookup(lookup(&[(TOKEN_VAR, "t"), (OCR_TIMEOUT_VAR, "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::from_lookup(lookup(&[(TOKEN_VAR, "secret-token")])).unwrap();
        assert!(!format!("{config:?}").contains("secret-token"));
    }

    #[test]
    fn test_error_message_names_variable() {
        assert!(ConfigError::MissingToken.to_string().contains(TOKEN_VAR));
    }
}
