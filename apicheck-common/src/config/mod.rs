//! Layered configuration for a verification run.
//!
//! Layers, lowest to highest priority:
//! - built-in defaults
//! - a TOML file (`--config`, else `./apicheck.toml`, else the platform
//!   config directory)
//! - `APICHECK_*` environment variables
//! - command-line overrides
//!
//! Every effective value is a [`Sourced`] so `apicheck config` can explain it.

pub mod env;
pub mod source;

pub use env::{ENV_PREFIX, EnvError, EnvParser};
pub use source::{ConfigSource, Sourced};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_REPORT_PATH: &str = "api-compatibility-report.json";
pub const CONFIG_FILE_NAME: &str = "apicheck.toml";

pub const MIN_TIMEOUT_MS: u64 = 1;
pub const MAX_TIMEOUT_MS: u64 = 600_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid environment: {}", join_errors(.0))]
    Env(Vec<EnvError>),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: &'static str },

    #[error("invalid {field}: {value} (valid: 1..=600000)")]
    OutOfRange { field: String, value: u64 },
}

fn join_errors(errors: &[EnvError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// On-disk form of the config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub report_path: Option<PathBuf>,
    /// Per-check budget overrides, by check label, in milliseconds.
    #[serde(default)]
    pub budgets: BTreeMap<String, u64>,
    /// Categories to run; empty runs all.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub report_path: Option<PathBuf>,
    pub categories: Vec<String>,
}

/// Effective configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifierConfig {
    pub base_url: Sourced<String>,
    pub timeout_ms: Sourced<u64>,
    pub report_path: Sourced<PathBuf>,
    pub budgets: Sourced<BTreeMap<String, u64>>,
    pub categories: Sourced<Vec<String>>,
    /// The file layer, if one was found.
    pub config_file: Option<PathBuf>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            base_url: Sourced::default_value(DEFAULT_BASE_URL.to_string()),
            timeout_ms: Sourced::default_value(DEFAULT_TIMEOUT_MS),
            report_path: Sourced::default_value(PathBuf::from(DEFAULT_REPORT_PATH)),
            budgets: Sourced::default_value(BTreeMap::new()),
            categories: Sourced::default_value(Vec::new()),
            config_file: None,
        }
    }
}

impl VerifierConfig {
    /// Resolve against the real filesystem and process environment.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match discover_config_file(overrides.config_path.as_deref()) {
            Some(path) => {
                let config = FileConfig::load(&path)?;
                debug!(path = %path.display(), "loaded config file");
                Some((path, config))
            }
            None => None,
        };
        Self::resolve(file, &mut EnvParser::new(), overrides)
    }

    /// Apply the file, environment and CLI layers over the defaults.
    pub fn resolve(
        file: Option<(PathBuf, FileConfig)>,
        env: &mut EnvParser,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some((path, file)) = file {
            let from_file = |value| Sourced::from_file(value, path.clone());
            config.base_url.overlay(file.base_url.map(from_file));
            if let Some(timeout) = file.timeout_ms {
                validate_timeout("timeout_ms", timeout)?;
                config.timeout_ms = Sourced::from_file(timeout, &path);
            }
            config
                .report_path
                .overlay(file.report_path.map(|p| Sourced::from_file(p, &path)));
            if !file.budgets.is_empty() {
                for (label, ms) in &file.budgets {
                    validate_timeout(&format!("budget for '{label}'"), *ms)?;
                }
                config.budgets = Sourced::from_file(file.budgets, &path);
            }
            if !file.categories.is_empty() {
                config.categories = Sourced::from_file(file.categories, &path);
            }
            config.config_file = Some(path);
        }

        config.base_url.overlay(env.get_string("BASE_URL"));
        config
            .timeout_ms
            .overlay(env.get_u64_range("TIMEOUT_MS", MIN_TIMEOUT_MS, MAX_TIMEOUT_MS));
        config.report_path.overlay(env.get_path("REPORT_PATH"));
        if env.has_errors() {
            return Err(ConfigError::Env(env.take_errors()));
        }

        config
            .base_url
            .overlay(overrides.base_url.clone().map(Sourced::from_cli));
        if let Some(timeout) = overrides.timeout_ms {
            validate_timeout("timeout_ms", timeout)?;
            config.timeout_ms = Sourced::from_cli(timeout);
        }
        config
            .report_path
            .overlay(overrides.report_path.clone().map(Sourced::from_cli));
        if !overrides.categories.is_empty() {
            config.categories = Sourced::from_cli(overrides.categories.clone());
        }

        let trimmed = config.base_url.value.trim_end_matches('/').to_string();
        validate_base_url(&trimmed)?;
        config.base_url.value = trimmed;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.value)
    }

    /// `(key, value, source)` rows for display.
    pub fn describe(&self) -> Vec<(&'static str, String, &ConfigSource)> {
        let budgets = if self.budgets.value.is_empty() {
            "(suite defaults)".to_string()
        } else {
            self.budgets
                .value
                .iter()
                .map(|(label, ms)| format!("{label}={ms}ms"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let categories = if self.categories.value.is_empty() {
            "(all)".to_string()
        } else {
            self.categories.value.join(", ")
        };
        vec![
            ("base_url", self.base_url.value.clone(), &self.base_url.source),
            (
                "timeout_ms",
                self.timeout_ms.value.to_string(),
                &self.timeout_ms.source,
            ),
            (
                "report_path",
                self.report_path.value.display().to_string(),
                &self.report_path.source,
            ),
            ("budgets", budgets, &self.budgets.source),
            ("categories", categories, &self.categories.source),
        ]
    }
}

/// Explicit path if given, else the first existing default location.
///
/// An explicit path is returned even when missing so loading reports it.
pub fn discover_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|path| path.is_file())
}

/// `<platform config dir>/apicheck.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "apicheck").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if (MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidBaseUrl {
        url: url.to_string(),
        reason,
    };
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| invalid("scheme must be http or https"))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || host.starts_with(':') {
        return Err(invalid("missing host"));
    }
    if rest.contains(['?', '#']) {
        return Err(invalid("query and fragment are not allowed"));
    }
    if url.contains(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }
    Ok(())
}
