//! Where an effective configuration value came from.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "origin", rename_all = "snake_case")]
pub enum ConfigSource {
    Default,
    File(PathBuf),
    /// Environment variable, by name.
    Env(String),
    Cli,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Env(var) => write!(f, "env {var}"),
            Self::Cli => f.write_str("command line"),
        }
    }
}

/// A value tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    pub fn default_value(value: T) -> Self {
        Self::new(value, ConfigSource::Default)
    }

    pub fn from_env(value: T, var: impl Into<String>) -> Self {
        Self::new(value, ConfigSource::Env(var.into()))
    }

    pub fn from_file(value: T, path: impl Into<PathBuf>) -> Self {
        Self::new(value, ConfigSource::File(path.into()))
    }

    pub fn from_cli(value: T) -> Self {
        Self::new(value, ConfigSource::Cli)
    }

    /// Replace the value if a higher-priority layer supplied one.
    pub fn overlay(&mut self, other: Option<Sourced<T>>) {
        if let Some(other) = other {
            *self = other;
        }
    }
}
