//! Stable codes, descriptions and remediation hints for every way a check
//! can fail.
//!
//! # Example
//!
//! ```rust
//! use apicheck_common::errors::FailureKind;
//!
//! let entry = FailureKind::MissingField.entry();
//! println!("{}: {}", entry.code, entry.message);
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a single check produced a failed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    // =========================================================================
    // Transport (E100-E199)
    // =========================================================================
    /// The service could not be reached.
    ConnectionError,
    /// The call did not complete within its timeout.
    Timeout,
    /// Status code outside the check's expected predicate.
    UnexpectedStatus,
    /// The body was not a JSON object.
    DecodeError,

    // =========================================================================
    // Contract (E200-E299)
    // =========================================================================
    /// The value a check should inspect is absent or not an object.
    MissingTarget,
    /// A required field is absent.
    MissingField,
    /// A field's value kind differs from its declared kind.
    TypeMismatch,
    /// A key violates the lower-camel-case wire convention.
    NamingViolation,
    /// A mapped field is present but null.
    NullField,

    // =========================================================================
    // Quality (E300-E399)
    // =========================================================================
    /// The response arrived later than its budget allows.
    PerformanceBudgetExceeded,
    /// Two endpoints disagree about a value that must match.
    CrossCheckMismatch,
}

impl FailureKind {
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ConnectionError,
            Self::Timeout,
            Self::UnexpectedStatus,
            Self::DecodeError,
            Self::MissingTarget,
            Self::MissingField,
            Self::TypeMismatch,
            Self::NamingViolation,
            Self::NullField,
            Self::PerformanceBudgetExceeded,
            Self::CrossCheckMismatch,
        ]
    }

    #[must_use]
    pub const fn code_number(&self) -> u16 {
        match self {
            Self::ConnectionError => 100,
            Self::Timeout => 101,
            Self::UnexpectedStatus => 102,
            Self::DecodeError => 103,

            Self::MissingTarget => 200,
            Self::MissingField => 201,
            Self::TypeMismatch => 202,
            Self::NamingViolation => 203,
            Self::NullField => 204,

            Self::PerformanceBudgetExceeded => 300,
            Self::CrossCheckMismatch => 301,
        }
    }

    /// Formatted code, e.g. `APC-E201`.
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("APC-E{:03}", self.code_number())
    }

    #[must_use]
    pub const fn category(&self) -> FailureCategory {
        match self.code_number() {
            100..=199 => FailureCategory::Transport,
            200..=299 => FailureCategory::Contract,
            _ => FailureCategory::Quality,
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ConnectionError => "Service could not be reached",
            Self::Timeout => "Request timed out",
            Self::UnexpectedStatus => "Unexpected HTTP status code",
            Self::DecodeError => "Response body is not a JSON object",
            Self::MissingTarget => "Expected response object is missing",
            Self::MissingField => "Required field missing",
            Self::TypeMismatch => "Field value has the wrong kind",
            Self::NamingViolation => "Field name is not lower camel case",
            Self::NullField => "Mapped field is null",
            Self::PerformanceBudgetExceeded => "Response exceeded its time budget",
            Self::CrossCheckMismatch => "Endpoints report inconsistent values",
        }
    }

    #[must_use]
    pub const fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::ConnectionError => &[
                "Check that the backend service is running",
                "Verify the base URL and port passed to apicheck",
            ],
            Self::Timeout => &[
                "Inspect slow queries behind the endpoint",
                "Raise --timeout-ms if the environment is known to be slow",
            ],
            Self::UnexpectedStatus => &[
                "Compare the controller's error handling with the expected status",
                "Check input validation for the parameters used by the check",
            ],
            Self::DecodeError => &[
                "Make sure the endpoint returns application/json",
                "Look for proxy or error pages replacing the API response",
            ],
            Self::MissingTarget => &[
                "Check that the response envelope wraps its payload in 'data'",
            ],
            Self::MissingField => &[
                "Make sure the backend DTO exposes every field of the front-end interface",
                "Check the mapper/query that populates the DTO",
            ],
            Self::TypeMismatch => &[
                "Align DTO field types with the front-end interface",
                "Avoid serializing numbers as strings",
            ],
            Self::NamingViolation => &[
                "Serialize JSON keys in lower camel case",
                "Remove legacy snake_case aliases from the DTO",
            ],
            Self::NullField => &[
                "Check the joins that resolve display names for the record",
            ],
            Self::PerformanceBudgetExceeded => &[
                "Profile the endpoint and add indexes for its filters",
                "Cache expensive aggregates",
            ],
            Self::CrossCheckMismatch => &[
                "Make sure both endpoints apply the same filters",
                "Check for soft-deleted rows counted by only one query",
            ],
        }
    }

    #[must_use]
    pub fn entry(&self) -> FailureEntry {
        FailureEntry {
            code: self.code_string(),
            category: self.category(),
            message: self.message().to_string(),
            remediation: self
                .remediation()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_string(), self.message())
    }
}

/// Grouping of related failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FailureCategory {
    /// Transport failures (E100-E199)
    Transport,
    /// Contract violations (E200-E299)
    Contract,
    /// Budget and consistency failures (E300-E399)
    Quality,
}

impl FailureCategory {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Transport => "Transport",
            Self::Contract => "Contract",
            Self::Quality => "Quality",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete catalog entry for one failure kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub code: String,
    pub category: FailureCategory,
    pub message: String,
    pub remediation: Vec<String>,
}

impl FailureEntry {
    /// One line per entry, e.g. `[APC-E201] Required field missing`.
    #[must_use]
    pub fn format_brief(&self) -> String {
        format!("[{}] {}", self.code, self.message)
    }
}

impl fmt::Display for FailureEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_brief())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_numbers_are_unique() {
        let mut seen = HashSet::new();
        for kind in FailureKind::all() {
            assert!(
                seen.insert(kind.code_number()),
                "Duplicate code number {} for {:?}",
                kind.code_number(),
                kind
            );
        }
    }

    #[test]
    fn test_code_format() {
        assert_eq!(FailureKind::ConnectionError.code_string(), "APC-E100");
        assert_eq!(FailureKind::MissingField.code_string(), "APC-E201");
        assert_eq!(FailureKind::CrossCheckMismatch.code_string(), "APC-E301");
    }

    #[test]
    fn test_categories_follow_ranges() {
        assert_eq!(FailureKind::Timeout.category(), FailureCategory::Transport);
        assert_eq!(FailureKind::NamingViolation.category(), FailureCategory::Contract);
        assert_eq!(
            FailureKind::PerformanceBudgetExceeded.category(),
            FailureCategory::Quality
        );
    }

    #[test]
    fn test_every_kind_has_remediation() {
        for kind in FailureKind::all() {
            assert!(!kind.remediation().is_empty(), "{kind:?} has no remediation");
        }
    }

    #[test]
    fn test_entry_brief() {
        let entry = FailureKind::MissingField.entry();
        assert_eq!(entry.format_brief(), "[APC-E201] Required field missing");
    }
}
