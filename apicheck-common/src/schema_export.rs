//! Machine-readable descriptions of apicheck's own output.
//!
//! - `report.schema.json`: JSON Schema of the persisted [`ReportDocument`]
//! - `failure-codes.json`: every failure code with its remediation hints

use crate::errors::catalog::{FailureCategory, FailureEntry, FailureKind};
use crate::report::ReportDocument;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const REPORT_SCHEMA_FILE: &str = "report.schema.json";
pub const FAILURE_CODES_FILE: &str = "failure-codes.json";

#[must_use]
pub fn generate_report_schema() -> RootSchema {
    schema_for!(ReportDocument)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureCategoryEntry {
    pub category: FailureCategory,
    /// Code range, e.g. "100-199".
    pub code_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureCatalog {
    pub schema_version: String,
    pub categories: Vec<FailureCategoryEntry>,
    pub failures: Vec<FailureEntry>,
}

#[must_use]
pub fn generate_failure_catalog() -> FailureCatalog {
    let categories = [
        (FailureCategory::Transport, "100-199"),
        (FailureCategory::Contract, "200-299"),
        (FailureCategory::Quality, "300-399"),
    ]
    .into_iter()
    .map(|(category, range)| FailureCategoryEntry {
        category,
        code_range: range.to_string(),
    })
    .collect();

    FailureCatalog {
        schema_version: "1.0".to_string(),
        categories,
        failures: FailureKind::all().iter().map(FailureKind::entry).collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaExportResult {
    pub files_generated: usize,
    pub files: Vec<String>,
    pub output_dir: String,
}

/// Write every export into `output_dir`, creating it if needed.
pub fn export_schemas(output_dir: &Path) -> std::io::Result<SchemaExportResult> {
    fs::create_dir_all(output_dir)?;

    let mut files = Vec::new();

    let report_path = output_dir.join(REPORT_SCHEMA_FILE);
    fs::write(
        &report_path,
        serde_json::to_string_pretty(&generate_report_schema())?,
    )?;
    files.push(report_path.display().to_string());

    let codes_path = output_dir.join(FAILURE_CODES_FILE);
    fs::write(
        &codes_path,
        serde_json::to_string_pretty(&generate_failure_catalog())?,
    )?;
    files.push(codes_path.display().to_string());

    Ok(SchemaExportResult {
        files_generated: files.len(),
        files,
        output_dir: output_dir.display().to_string(),
    })
}
