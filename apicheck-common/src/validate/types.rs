use super::Finding;
use crate::errors::FailureKind;
use crate::schema::{InterfaceSchema, ValueKind};
use serde_json::{Map, Value};

/// One field whose actual kind is incompatible with its declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub field: String,
    pub expected: ValueKind,
    pub actual: ValueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReport {
    pub schema: String,
    /// Fields present in both the declared kinds and the data.
    pub checked: usize,
    pub mismatches: Vec<TypeMismatch>,
}

/// Compare every declared field that is also present in `data`.
///
/// Absent fields are left to the presence check. Null never mismatches.
pub fn check_types(data: &Map<String, Value>, schema: &InterfaceSchema) -> TypeReport {
    let mut checked = 0;
    let mut mismatches = Vec::new();

    for (field, expected) in schema.field_kinds() {
        let Some(value) = data.get(field) else {
            continue;
        };
        checked += 1;
        let actual = ValueKind::of(value);
        if !expected.accepts(actual) {
            mismatches.push(TypeMismatch {
                field: field.clone(),
                expected: *expected,
                actual,
            });
        }
    }

    TypeReport {
        schema: schema.name().to_string(),
        checked,
        mismatches,
    }
}

impl Finding for TypeReport {
    fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn message(&self) -> String {
        if self.mismatches.is_empty() {
            return format!("{}: {} typed fields match", self.schema, self.checked);
        }
        let details: Vec<String> = self
            .mismatches
            .iter()
            .map(|m| format!("{}: expected {}, got {}", m.field, m.expected, m.actual))
            .collect();
        format!("{}: field type mismatches: {}", self.schema, details.join("; "))
    }

    fn failure_kind(&self) -> FailureKind {
        FailureKind::TypeMismatch
    }
}
