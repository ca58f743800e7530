//! Reduction of a result log into a categorized report.
//!
//! [`aggregate`] is a pure function of its input: the same entries always
//! produce the same [`Report`]. Wall-clock data lives only in the
//! [`ReportDocument`] wrapper that gets persisted.

use crate::errors::FailureKind;
use crate::runner::{RunError, TestResult};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Minimum success rate (percent) for [`StatusTier::Ready`].
pub const READY_THRESHOLD: f64 = 90.0;
/// Minimum success rate (percent) for [`StatusTier::Caution`].
pub const CAUTION_THRESHOLD: f64 = 70.0;

/// Deployment recommendation derived from the success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Ready,
    Caution,
    Blocked,
}

impl StatusTier {
    pub fn from_rate(success_rate: f64) -> Self {
        if success_rate >= READY_THRESHOLD {
            Self::Ready
        } else if success_rate >= CAUTION_THRESHOLD {
            Self::Caution
        } else {
            Self::Blocked
        }
    }

    pub const fn recommendation(&self) -> &'static str {
        match self {
            Self::Ready => "interface is compatible and ready for use",
            Self::Caution => "interface is mostly compatible; fix the failures before release",
            Self::Blocked => "interface is not compatible; significant changes are required",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "READY",
            Self::Caution => "CAUTION",
            Self::Blocked => "BLOCKED",
        })
    }
}

/// Per-category counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryRollup {
    pub name: String,
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

/// A failed entry as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportedFailure {
    pub category: String,
    pub check: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    /// Percentage in `0.0..=100.0`; `0.0` for an empty log.
    pub success_rate: f64,
    /// In order of first appearance in the log.
    pub categories: Vec<CategoryRollup>,
    /// Every failure, in log order.
    pub failures: Vec<ReportedFailure>,
    pub tier: StatusTier,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.failure == 0
    }

    /// Distinct failure kinds, in order of first occurrence.
    pub fn failure_kinds(&self) -> Vec<FailureKind> {
        let mut kinds = Vec::new();
        for kind in self.failures.iter().filter_map(|f| f.kind) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }
}

pub fn aggregate(entries: &[TestResult]) -> Report {
    let mut categories: Vec<CategoryRollup> = Vec::new();
    let mut failures = Vec::new();

    for entry in entries {
        let index = match categories.iter().position(|c| c.name == entry.category) {
            Some(index) => index,
            None => {
                categories.push(CategoryRollup {
                    name: entry.category.clone(),
                    total: 0,
                    success: 0,
                    failure: 0,
                });
                categories.len() - 1
            }
        };
        let rollup = &mut categories[index];
        rollup.total += 1;
        if entry.success {
            rollup.success += 1;
        } else {
            rollup.failure += 1;
            failures.push(ReportedFailure {
                category: entry.category.clone(),
                check: entry.check.clone(),
                message: entry.message.clone(),
                kind: entry.failure,
            });
        }
    }

    let total = entries.len();
    let success = entries.iter().filter(|e| e.success).count();
    let success_rate = if total == 0 {
        0.0
    } else {
        success as f64 * 100.0 / total as f64
    };

    Report {
        total,
        success,
        failure: total - success,
        success_rate,
        categories,
        failures,
        tier: StatusTier::from_rate(success_rate),
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read report from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted form of a run: the report plus when and against what it ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub base_url: String,
    /// Why the run stopped early, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
    pub report: Report,
}

impl ReportDocument {
    pub fn new(base_url: impl Into<String>, report: Report, aborted: Option<&RunError>) -> Self {
        Self {
            generated_at: Utc::now(),
            base_url: base_url.into(),
            aborted: aborted.map(ToString::to_string),
            report,
        }
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let write_err = |source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(write_err)?;
        info!(path = %path.display(), "report written");
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
