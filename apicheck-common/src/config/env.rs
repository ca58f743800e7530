//! Environment variable parsing with type safety.
//!
//! Variables are read through [`EnvParser`], which collects every bad value
//! so all of them are reported together, and tags good values with their
//! variable name.

use super::source::Sourced;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix shared by every apicheck variable.
pub const ENV_PREFIX: &str = "APICHECK_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("Invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidValue {
        var: String,
        expected: String,
        value: String,
    },

    #[error("Value out of range for {var}: {value} (valid: {min}..={max})")]
    OutOfRange {
        var: String,
        value: String,
        min: String,
        max: String,
    },
}

enum Lookup {
    Process,
    Fixed(HashMap<String, String>),
}

/// Type-safe environment variable parser.
pub struct EnvParser {
    lookup: Lookup,
    errors: Vec<EnvError>,
}

impl Default for EnvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvParser {
    /// Parser over the process environment.
    pub fn new() -> Self {
        Self {
            lookup: Lookup::Process,
            errors: Vec::new(),
        }
    }

    /// Parser over a fixed set of variables, keyed by full name.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            lookup: Lookup::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn take_errors(&mut self) -> Vec<EnvError> {
        std::mem::take(&mut self.errors)
    }

    fn var_name(name: &str) -> String {
        format!("{ENV_PREFIX}{name}")
    }

    fn read(&self, var_name: &str) -> Option<String> {
        let value = match &self.lookup {
            Lookup::Process => env::var(var_name).ok(),
            Lookup::Fixed(vars) => vars.get(var_name).cloned(),
        };
        value.filter(|value| !value.trim().is_empty())
    }

    pub fn get_string(&mut self, name: &str) -> Option<Sourced<String>> {
        let var_name = Self::var_name(name);
        self.read(&var_name)
            .map(|value| Sourced::from_env(value.trim().to_string(), var_name))
    }

    pub fn get_path(&mut self, name: &str) -> Option<Sourced<PathBuf>> {
        self.get_string(name)
            .map(|sourced| Sourced::new(PathBuf::from(sourced.value), sourced.source))
    }

    /// A u64 within `min..=max`. Bad values are recorded and ignored.
    pub fn get_u64_range(&mut self, name: &str, min: u64, max: u64) -> Option<Sourced<u64>> {
        let var_name = Self::var_name(name);
        let value = self.read(&var_name)?;
        match value.trim().parse::<u64>() {
            Ok(n) if (min..=max).contains(&n) => Some(Sourced::from_env(n, var_name)),
            Ok(n) => {
                self.errors.push(EnvError::OutOfRange {
                    var: var_name,
                    value: n.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
                None
            }
            Err(_) => {
                self.errors.push(EnvError::InvalidValue {
                    var: var_name,
                    expected: "unsigned 64-bit integer".to_string(),
                    value,
                });
                None
            }
        }
    }

    /// One of `allowed`, compared case-insensitively and returned lowercased.
    pub fn get_choice(&mut self, name: &str, allowed: &[&str]) -> Option<Sourced<String>> {
        let sourced = self.get_string(name)?;
        let lowered = sourced.value.to_lowercase();
        if allowed.contains(&lowered.as_str()) {
            Some(Sourced::new(lowered, sourced.source))
        } else {
            self.errors.push(EnvError::InvalidValue {
                var: Self::var_name(name),
                expected: allowed.join("|"),
                value: sourced.value,
            });
            None
        }
    }
}
