//! Failure catalog for contract checks.
//!
//! # Code Ranges
//!
//! | Range      | Category    | Description                              |
//! |------------|-------------|------------------------------------------|
//! | E100-E199  | Transport   | Reaching the service and reading replies |
//! | E200-E299  | Contract    | Schema and naming violations             |
//! | E300-E399  | Quality     | Budgets and cross-endpoint consistency   |

pub mod catalog;

pub use catalog::{FailureCategory, FailureEntry, FailureKind};
