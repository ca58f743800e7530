//! Declarative check definitions.
//!
//! A [`Suite`] is an ordered list of named [`Category`]s, each holding an
//! ordered list of [`CheckDefinition`]s. Definitions describe *what* to
//! check; [`crate::runner::TestRunner`] decides *how* to execute them.

pub mod sales;

use crate::client::RequestSpec;
use crate::performance::PerformanceBudget;
use crate::runner::RunError;
use crate::schema::SchemaRegistry;
use std::collections::BTreeMap;
use std::fmt;

/// Expected status code for a check's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPredicate {
    /// Any 2xx status.
    Success,
    Exact(u16),
    OneOf(Vec<u16>),
    /// Any status strictly below the bound (e.g. "not a server error").
    Below(u16),
}

impl StatusPredicate {
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Success => (200..300).contains(&status),
            Self::Exact(expected) => status == *expected,
            Self::OneOf(allowed) => allowed.contains(&status),
            Self::Below(bound) => status < *bound,
        }
    }
}

impl fmt::Display for StatusPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("2xx"),
            Self::Exact(status) => write!(f, "{status}"),
            Self::OneOf(allowed) => {
                let codes: Vec<String> = allowed.iter().map(u16::to_string).collect();
                write!(f, "one of {}", codes.join("/"))
            }
            Self::Below(bound) => write!(f, "below {bound}"),
        }
    }
}

/// Validate the object at `pointer` against a registered schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBinding {
    /// JSON pointer into the body; `""` is the envelope itself.
    pub pointer: String,
    pub schema: String,
    /// Also lint the object's keys for snake_case.
    pub naming: bool,
    /// Skip instead of failing when nothing exists at `pointer`.
    pub optional: bool,
}

impl SchemaBinding {
    pub fn at(pointer: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            schema: schema.into(),
            naming: false,
            optional: false,
        }
    }

    #[must_use]
    pub fn with_naming(mut self) -> Self {
        self.naming = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// One assertion over a decoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    Schema(SchemaBinding),
    /// Every field at `pointer` must exist and be non-null.
    NonNull {
        pointer: String,
        fields: Vec<String>,
    },
}

impl Assertion {
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            Self::Schema(binding) => Some(&binding.schema),
            Self::NonNull { .. } => None,
        }
    }
}

/// A single request with its expectations.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestCheck {
    pub label: String,
    pub request: RequestSpec,
    pub expect: StatusPredicate,
    pub assertions: Vec<Assertion>,
    pub budget: Option<PerformanceBudget>,
}

impl RequestCheck {
    pub fn new(label: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            label: label.into(),
            request,
            expect: StatusPredicate::Success,
            assertions: Vec::new(),
            budget: None,
        }
    }

    #[must_use]
    pub fn expect(mut self, predicate: StatusPredicate) -> Self {
        self.expect = predicate;
        self
    }

    #[must_use]
    pub fn schema(mut self, binding: SchemaBinding) -> Self {
        self.assertions.push(Assertion::Schema(binding));
        self
    }

    #[must_use]
    pub fn non_null<S: Into<String>>(
        mut self,
        pointer: impl Into<String>,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.assertions.push(Assertion::NonNull {
            pointer: pointer.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        });
        self
    }

    #[must_use]
    pub fn budget_ms(mut self, max_elapsed_ms: u64) -> Self {
        self.budget = Some(PerformanceBudget::from_millis(max_elapsed_ms));
        self
    }

    /// Only the status code is asserted; the body may be anything.
    pub fn is_status_only(&self) -> bool {
        self.assertions.is_empty()
    }
}

/// One side of a cross-check: a request and the value to extract from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub label: String,
    pub request: RequestSpec,
    pub pointer: String,
}

impl Probe {
    pub fn new(label: impl Into<String>, request: RequestSpec, pointer: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            request,
            pointer: pointer.into(),
        }
    }
}

/// Two independent requests whose derived values must be equal.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossCheck {
    pub label: String,
    pub left: Probe,
    pub right: Probe,
}

impl CrossCheck {
    pub fn new(label: impl Into<String>, left: Probe, right: Probe) -> Self {
        Self {
            label: label.into(),
            left,
            right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckDefinition {
    Request(RequestCheck),
    Cross(CrossCheck),
}

impl CheckDefinition {
    pub fn label(&self) -> &str {
        match self {
            Self::Request(check) => &check.label,
            Self::Cross(check) => &check.label,
        }
    }

    /// Names of every schema this check validates against.
    pub fn schema_names(&self) -> Vec<&str> {
        match self {
            Self::Request(check) => check
                .assertions
                .iter()
                .filter_map(Assertion::schema_name)
                .collect(),
            Self::Cross(_) => Vec::new(),
        }
    }
}

impl From<RequestCheck> for CheckDefinition {
    fn from(check: RequestCheck) -> Self {
        Self::Request(check)
    }
}

impl From<CrossCheck> for CheckDefinition {
    fn from(check: CrossCheck) -> Self {
        Self::Cross(check)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub checks: Vec<CheckDefinition>,
}

/// Ordered categories of checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suite {
    categories: Vec<Category>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category; declaration order is execution order.
    #[must_use]
    pub fn category(
        mut self,
        name: impl Into<String>,
        checks: impl IntoIterator<Item = CheckDefinition>,
    ) -> Self {
        self.categories.push(Category {
            name: name.into(),
            checks: checks.into_iter().collect(),
        });
        self
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn check_count(&self) -> usize {
        self.categories.iter().map(|c| c.checks.len()).sum()
    }

    /// Keep only the named categories, in declared order.
    ///
    /// An empty selection keeps everything.
    pub fn filtered(self, names: &[String]) -> Result<Self, RunError> {
        if names.is_empty() {
            return Ok(self);
        }
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.categories.iter().any(|c| &c.name == *name))
        {
            let available: Vec<&str> = self.categories.iter().map(|c| c.name.as_str()).collect();
            return Err(RunError::UnknownCategory {
                name: unknown.clone(),
                available: available.join(", "),
            });
        }
        Ok(Self {
            categories: self
                .categories
                .into_iter()
                .filter(|c| names.contains(&c.name))
                .collect(),
        })
    }

    /// Replace budgets by check label. Labels without a request check are ignored.
    pub fn apply_budget_overrides(&mut self, budgets: &BTreeMap<String, u64>) {
        for category in &mut self.categories {
            for check in &mut category.checks {
                if let CheckDefinition::Request(request) = check
                    && let Some(ms) = budgets.get(&request.label)
                {
                    request.budget = Some(PerformanceBudget::from_millis(*ms));
                }
            }
        }
    }

    /// Verify every referenced schema is registered.
    pub fn validate(&self, registry: &SchemaRegistry) -> Result<(), RunError> {
        for category in &self.categories {
            for check in &category.checks {
                if let Some(schema) = check
                    .schema_names()
                    .into_iter()
                    .find(|name| !registry.contains(name))
                {
                    return Err(RunError::UnknownSchema {
                        category: category.name.clone(),
                        check: check.label().to_string(),
                        schema: schema.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
