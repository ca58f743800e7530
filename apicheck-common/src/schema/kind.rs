//! Runtime classification of JSON values.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of a JSON value as observed on the wire.
///
/// Always derived from an actual value via [`ValueKind::of`]; integers and
/// fractional numbers both classify as [`ValueKind::Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Array,
    Object,
    Null,
}

impl ValueKind {
    /// Classify an actual JSON value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether a value of kind `actual` satisfies a field declared as `self`.
    ///
    /// Null is accepted for every declared kind, including required fields.
    #[must_use]
    pub fn accepts(self, actual: Self) -> bool {
        actual == Self::Null || self == actual
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifies_every_json_variant() {
        assert_eq!(ValueKind::of(&json!(1)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!(-7)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!(2.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({"a": 1})), ValueKind::Object);
        assert_eq!(ValueKind::of(&Value::Null), ValueKind::Null);
    }

    #[test]
    fn test_booleans_are_not_numbers() {
        assert!(!ValueKind::Number.accepts(ValueKind::of(&json!(false))));
    }

    #[test]
    fn test_null_accepted_for_every_kind() {
        for declared in [
            ValueKind::Number,
            ValueKind::String,
            ValueKind::Boolean,
            ValueKind::Array,
            ValueKind::Object,
            ValueKind::Null,
        ] {
            assert!(declared.accepts(ValueKind::Null), "{declared} should accept null");
        }
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ValueKind::Array).unwrap(), "\"array\"");
        assert_eq!(ValueKind::Boolean.to_string(), "boolean");
    }
}
