use super::Finding;
use crate::errors::FailureKind;
use crate::schema::InterfaceSchema;
use serde_json::{Map, Value};

/// Result of checking required fields against a response object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceReport {
    pub schema: String,
    pub required: usize,
    /// Required fields absent from the data, in declaration order.
    pub missing: Vec<String>,
}

/// `missing = required − keys(data)`.
pub fn check_presence(data: &Map<String, Value>, schema: &InterfaceSchema) -> PresenceReport {
    let missing = schema
        .required_fields()
        .iter()
        .filter(|field| !data.contains_key(field.as_str()))
        .cloned()
        .collect();

    PresenceReport {
        schema: schema.name().to_string(),
        required: schema.required_fields().len(),
        missing,
    }
}

impl Finding for PresenceReport {
    fn passed(&self) -> bool {
        self.missing.is_empty()
    }

    fn message(&self) -> String {
        if self.missing.is_empty() {
            format!(
                "{}: all {} required fields present",
                self.schema, self.required
            )
        } else {
            format!(
                "{}: missing required fields: {}",
                self.schema,
                self.missing.join(", ")
            )
        }
    }

    fn failure_kind(&self) -> FailureKind {
        FailureKind::MissingField
    }
}
