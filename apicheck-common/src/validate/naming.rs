use super::Finding;
use crate::errors::FailureKind;
use serde_json::{Map, Value};

/// Top-level keys that break the lower-camel-case wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingReport {
    pub checked: usize,
    pub violations: Vec<String>,
}

/// Flag every top-level key containing an underscore.
///
/// Runs on raw keys, whether or not they belong to any schema.
pub fn check_naming(data: &Map<String, Value>) -> NamingReport {
    NamingReport {
        checked: data.len(),
        violations: data
            .keys()
            .filter(|key| key.contains('_'))
            .cloned()
            .collect(),
    }
}

impl Finding for NamingReport {
    fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    fn message(&self) -> String {
        if self.violations.is_empty() {
            format!("{} keys follow lower camel case", self.checked)
        } else {
            format!("snake_case keys found: {}", self.violations.join(", "))
        }
    }

    fn failure_kind(&self) -> FailureKind {
        FailureKind::NamingViolation
    }
}
