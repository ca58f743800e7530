//! Shared engine for apicheck.
//!
//! Validates a running service's JSON responses against declared interface
//! schemas and reduces the outcomes into a categorized report.
//!
//! Pipeline: [`schema::SchemaRegistry`] + [`checks::Suite`] →
//! [`runner::TestRunner`] (driving a [`client::Transport`]) →
//! [`runner::ResultLog`] → [`report::aggregate`] → [`report::Report`].

#![forbid(unsafe_code)]

pub mod checks;
pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod performance;
pub mod render;
pub mod report;
pub mod runner;
pub mod schema;
pub mod schema_export;
pub mod validate;

pub use checks::{
    Assertion, Category, CheckDefinition, CrossCheck, Probe, RequestCheck, SchemaBinding,
    StatusPredicate, Suite,
};
pub use client::{
    CheckOutcome, HttpMethod, HttpResponse, RequestClient, RequestSpec, Transport,
    TransportErrorKind, TransportFailure,
};
pub use config::{ConfigError, ConfigSource, EnvParser, Overrides, Sourced, VerifierConfig};
pub use errors::{FailureCategory, FailureKind};
pub use logging::{LogConfig, LogError, LogFormat, init_logging};
pub use performance::{BudgetVerdict, PerformanceBudget};
pub use render::{RenderOptions, render_text};
pub use report::{
    CategoryRollup, Report, ReportDocument, ReportError, ReportedFailure, StatusTier, aggregate,
};
pub use runner::{ResultLog, RunError, RunSummary, TestResult, TestRunner};
pub use schema::{InterfaceSchema, SchemaError, SchemaRegistry, SchemaRegistryBuilder, ValueKind};
