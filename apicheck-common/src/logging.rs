//! Tracing subscriber setup.
//!
//! Diagnostics always go to stderr; stdout is reserved for the report.

use crate::config::EnvParser;
use std::fmt;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `apicheck_common=debug`.
    pub level: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
            ansi: true,
        }
    }
}

impl LogConfig {
    /// Read `APICHECK_LOG_LEVEL` and `APICHECK_LOG_FORMAT`.
    ///
    /// Unrecognised formats fall back to text.
    pub fn from_env() -> Self {
        Self::from_parser(&mut EnvParser::new())
    }

    pub fn from_parser(env: &mut EnvParser) -> Self {
        let mut config = Self::default();
        if let Some(level) = env.get_string("LOG_LEVEL") {
            config.level = level.value;
        }
        if let Some(format) = env.get_choice("LOG_FORMAT", &["text", "json"]) {
            config.format = if format.value == "json" {
                LogFormat::Json
            } else {
                LogFormat::Text
            };
        }
        config
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn filter(&self) -> Result<EnvFilter, LogError> {
        EnvFilter::try_new(&self.level).map_err(|err| LogError::InvalidFilter {
            filter: self.level.clone(),
            message: err.to_string(),
        })
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let filter = config.filter()?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.ansi)
                    .with_target(false),
            )
            .try_init(),
    };
    installed.map_err(|err| LogError::Install(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_defaults() {
        let mut env = EnvParser::from_vars([
            ("APICHECK_LOG_LEVEL", "debug"),
            ("APICHECK_LOG_FORMAT", "json"),
        ]);
        let config = LogConfig::from_parser(&mut env);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_bad_format_falls_back_to_text() {
        let mut env = EnvParser::from_vars([("APICHECK_LOG_FORMAT", "xml")]);
        assert_eq!(LogConfig::from_parser(&mut env).format, LogFormat::Text);
    }

    #[test]
    fn test_builders_override_env() {
        let config = LogConfig::default()
            .with_level("debug")
            .with_format(LogFormat::Json)
            .with_ansi(false);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.ansi);
    }

    #[test]
    fn test_invalid_filter_is_an_error() {
        let config = LogConfig::default().with_level("apicheck=loud");
        assert!(matches!(config.filter(), Err(LogError::InvalidFilter { .. })));
    }
}
