//! Wall-clock budgets for checks.
//!
//! A budget verdict is reported on its own; it never replaces or merges
//! with the correctness results for the same response.

use crate::errors::FailureKind;
use crate::validate::Finding;
use serde::{Deserialize, Serialize};

/// Maximum acceptable elapsed time for one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceBudget {
    pub max_elapsed_ms: u64,
}

impl PerformanceBudget {
    pub const fn from_millis(max_elapsed_ms: u64) -> Self {
        Self { max_elapsed_ms }
    }

    /// Compare an observed elapsed time against this budget.
    pub fn assess(&self, label: &str, elapsed_ms: u64) -> BudgetVerdict {
        BudgetVerdict {
            label: label.to_string(),
            elapsed_ms,
            budget_ms: self.max_elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetVerdict {
    pub label: String,
    pub elapsed_ms: u64,
    pub budget_ms: u64,
}

impl Finding for BudgetVerdict {
    fn passed(&self) -> bool {
        self.elapsed_ms <= self.budget_ms
    }

    fn message(&self) -> String {
        if self.passed() {
            format!(
                "{} responded in {}ms (budget {}ms)",
                self.label, self.elapsed_ms, self.budget_ms
            )
        } else {
            format!(
                "{} took {}ms, over the {}ms budget",
                self.label, self.elapsed_ms, self.budget_ms
            )
        }
    }

    fn failure_kind(&self) -> FailureKind {
        FailureKind::PerformanceBudgetExceeded
    }
}
