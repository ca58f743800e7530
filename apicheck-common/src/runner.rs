//! Sequential execution of a [`Suite`] into a [`ResultLog`].
//!
//! Categories run in declared order and checks within a category run in
//! declared order. A failing check is recorded and the run moves on; only a
//! check that names an unregistered schema stops the run, leaving the log
//! with whatever was recorded before it.

use crate::checks::{Assertion, CheckDefinition, CrossCheck, Probe, RequestCheck, SchemaBinding, Suite};
use crate::client::{CheckOutcome, HttpResponse, Transport, TransportErrorKind, TransportFailure};
use crate::errors::FailureKind;
use crate::report::{Report, aggregate};
use crate::schema::{InterfaceSchema, SchemaRegistry};
use crate::validate::{Finding, check_naming, check_presence, check_types};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// One recorded check outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestResult {
    pub category: String,
    /// Label of the check that produced this entry.
    pub check: String,
    pub message: String,
    pub success: bool,
    /// Set exactly when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    pub timestamp: DateTime<Utc>,
}

impl TestResult {
    pub fn pass(category: &str, check: &str, message: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            check: check.to_string(),
            message: message.into(),
            success: true,
            failure: None,
            timestamp: Utc::now(),
        }
    }

    pub fn fail(category: &str, check: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            category: category.to_string(),
            check: check.to_string(),
            message: message.into(),
            success: false,
            failure: Some(kind),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only record of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultLog {
    entries: Vec<TestResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, result: TestResult) {
        if result.success {
            debug!(category = %result.category, check = %result.check, "{}", result.message);
        } else {
            warn!(
                category = %result.category,
                check = %result.check,
                kind = ?result.failure,
                "{}",
                result.message
            );
        }
        self.entries.push(result);
    }

    pub fn entries(&self) -> &[TestResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<TestResult> {
        self.entries
    }
}

/// Errors in the check definitions themselves, as opposed to the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("check '{check}' in category '{category}' references unregistered schema {schema}")]
    UnknownSchema {
        category: String,
        check: String,
        schema: String,
    },

    #[error("unknown category '{name}' (available: {available})")]
    UnknownCategory { name: String, available: String },
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub log: ResultLog,
    /// Set when the run stopped early on a definition error.
    pub aborted: Option<RunError>,
}

impl RunSummary {
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    pub fn report(&self) -> Report {
        aggregate(self.log.entries())
    }
}

/// Drives checks through a [`Transport`] and records every outcome.
pub struct TestRunner<'a, T: Transport> {
    registry: &'a SchemaRegistry,
    transport: &'a T,
}

impl<'a, T: Transport> TestRunner<'a, T> {
    pub fn new(registry: &'a SchemaRegistry, transport: &'a T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    pub fn run(&self, suite: &Suite) -> RunSummary {
        let mut log = ResultLog::new();
        info!(
            categories = suite.categories().len(),
            checks = suite.check_count(),
            "starting run"
        );

        for category in suite.categories() {
            info!(category = %category.name, "running category");
            for check in &category.checks {
                if let Err(err) = self.run_check(&category.name, check, &mut log) {
                    warn!(error = %err, recorded = log.len(), "run aborted");
                    return RunSummary {
                        log,
                        aborted: Some(err),
                    };
                }
            }
        }

        info!(recorded = log.len(), "run complete");
        RunSummary { log, aborted: None }
    }

    fn run_check(
        &self,
        category: &str,
        check: &CheckDefinition,
        log: &mut ResultLog,
    ) -> Result<(), RunError> {
        debug!(category, check = check.label(), "running check");
        match check {
            CheckDefinition::Request(request) => {
                let schemas = self.resolve_schemas(category, request)?;
                self.run_request(category, request, &schemas, log);
            }
            CheckDefinition::Cross(cross) => self.run_cross(category, cross, log),
        }
        Ok(())
    }

    /// Look up every schema before issuing the request.
    fn resolve_schemas(
        &self,
        category: &str,
        check: &RequestCheck,
    ) -> Result<Vec<&'a InterfaceSchema>, RunError> {
        check
            .assertions
            .iter()
            .filter_map(Assertion::schema_name)
            .map(|name| {
                self.registry
                    .lookup(name)
                    .map_err(|_| RunError::UnknownSchema {
                        category: category.to_string(),
                        check: check.label.clone(),
                        schema: name.to_string(),
                    })
            })
            .collect()
    }

    fn run_request(
        &self,
        category: &str,
        check: &RequestCheck,
        schemas: &[&InterfaceSchema],
        log: &mut ResultLog,
    ) {
        let label = check.label.as_str();
        let response = match self.transport.call(&check.request) {
            CheckOutcome::Response(response) => response,
            CheckOutcome::Failure(failure) => {
                // A status-only check does not care whether the body decodes.
                if failure.kind == TransportErrorKind::DecodeError
                    && check.is_status_only()
                    && let Some(status) = failure.status
                {
                    log.append(status_result(category, check, status));
                } else {
                    log.append(transport_result(category, label, &failure));
                }
                return;
            }
        };

        let status_ok = check.expect.matches(response.status);
        if check.is_status_only() || !status_ok {
            log.append(status_result(category, check, response.status));
        }

        if status_ok {
            let mut schemas = schemas.iter();
            for assertion in &check.assertions {
                match assertion {
                    Assertion::Schema(binding) => {
                        if let Some(schema) = schemas.next() {
                            validate_binding(category, label, &response, binding, schema, log);
                        }
                    }
                    Assertion::NonNull { pointer, fields } => {
                        validate_non_null(category, label, &response, pointer, fields, log);
                    }
                }
            }
        }

        if let Some(budget) = &check.budget {
            let verdict = budget.assess(label, response.elapsed_ms);
            log.append(finding_result(category, label, &verdict));
        }
    }

    fn run_cross(&self, category: &str, check: &CrossCheck, log: &mut ResultLog) {
        let label = check.label.as_str();
        let left = match self.evaluate_probe(&check.left) {
            Ok(value) => value,
            Err((kind, message)) => {
                log.append(TestResult::fail(category, label, kind, message));
                return;
            }
        };
        let right = match self.evaluate_probe(&check.right) {
            Ok(value) => value,
            Err((kind, message)) => {
                log.append(TestResult::fail(category, label, kind, message));
                return;
            }
        };

        if values_agree(&left, &right) {
            log.append(TestResult::pass(
                category,
                label,
                format!(
                    "{} ({left}) matches {} ({right})",
                    check.left.label, check.right.label
                ),
            ));
        } else {
            log.append(TestResult::fail(
                category,
                label,
                FailureKind::CrossCheckMismatch,
                format!(
                    "{} is {left} but {} is {right}",
                    check.left.label, check.right.label
                ),
            ));
        }
    }

    fn evaluate_probe(&self, probe: &Probe) -> Result<Value, (FailureKind, String)> {
        match self.transport.call(&probe.request) {
            CheckOutcome::Failure(failure) => Err((
                failure_kind_for(failure.kind),
                format!("{}: {}", probe.label, failure.message),
            )),
            CheckOutcome::Response(response) if !response.is_success() => Err((
                FailureKind::UnexpectedStatus,
                format!("{}: status {}", probe.label, response.status),
            )),
            CheckOutcome::Response(response) => response
                .pointer(&probe.pointer)
                .cloned()
                .ok_or_else(|| {
                    (
                        FailureKind::MissingTarget,
                        format!("{}: nothing at {}", probe.label, probe.pointer),
                    )
                }),
        }
    }
}

pub(crate) fn failure_kind_for(kind: TransportErrorKind) -> FailureKind {
    match kind {
        TransportErrorKind::Timeout => FailureKind::Timeout,
        TransportErrorKind::ConnectionError => FailureKind::ConnectionError,
        TransportErrorKind::DecodeError => FailureKind::DecodeError,
    }
}

fn transport_result(category: &str, label: &str, failure: &TransportFailure) -> TestResult {
    let elapsed = failure
        .elapsed_ms
        .map(|ms| format!(" after {ms}ms"))
        .unwrap_or_default();
    TestResult::fail(
        category,
        label,
        failure_kind_for(failure.kind),
        format!("{label}: {}{elapsed}: {}", failure.kind, failure.message),
    )
}

fn status_result(category: &str, check: &RequestCheck, status: u16) -> TestResult {
    let label = check.label.as_str();
    if check.expect.matches(status) {
        TestResult::pass(
            category,
            label,
            format!("{label}: status {status} (expected {})", check.expect),
        )
    } else {
        TestResult::fail(
            category,
            label,
            FailureKind::UnexpectedStatus,
            format!("{label}: expected status {}, got {status}", check.expect),
        )
    }
}

fn finding_result(category: &str, label: &str, finding: &impl Finding) -> TestResult {
    if finding.passed() {
        TestResult::pass(category, label, finding.message())
    } else {
        TestResult::fail(category, label, finding.failure_kind(), finding.message())
    }
}

/// Object at `pointer`; `""` is the body itself.
fn target<'r>(response: &'r HttpResponse, pointer: &str) -> Option<&'r Map<String, Value>> {
    if pointer.is_empty() {
        Some(&response.body)
    } else {
        response.pointer(pointer).and_then(Value::as_object)
    }
}

fn describe_pointer(pointer: &str) -> &str {
    if pointer.is_empty() { "response body" } else { pointer }
}

fn validate_binding(
    category: &str,
    label: &str,
    response: &HttpResponse,
    binding: &SchemaBinding,
    schema: &InterfaceSchema,
    log: &mut ResultLog,
) {
    let Some(data) = target(response, &binding.pointer) else {
        if binding.optional {
            info!(
                check = label,
                pointer = %binding.pointer,
                schema = %binding.schema,
                "optional target absent, skipping"
            );
        } else {
            log.append(TestResult::fail(
                category,
                label,
                FailureKind::MissingTarget,
                format!(
                    "{}: no object at {} to validate",
                    binding.schema,
                    describe_pointer(&binding.pointer)
                ),
            ));
        }
        return;
    };

    log.append(finding_result(category, label, &check_presence(data, schema)));
    log.append(finding_result(category, label, &check_types(data, schema)));
    if binding.naming {
        log.append(finding_result(category, label, &check_naming(data)));
    }
}

fn validate_non_null(
    category: &str,
    label: &str,
    response: &HttpResponse,
    pointer: &str,
    fields: &[String],
    log: &mut ResultLog,
) {
    let Some(data) = target(response, pointer) else {
        log.append(TestResult::fail(
            category,
            label,
            FailureKind::MissingTarget,
            format!("no object at {} to check field mapping", describe_pointer(pointer)),
        ));
        return;
    };

    let offending: Vec<&str> = fields
        .iter()
        .filter(|field| data.get(field.as_str()).is_none_or(Value::is_null))
        .map(String::as_str)
        .collect();

    if offending.is_empty() {
        log.append(TestResult::pass(
            category,
            label,
            format!("mapped fields present: {}", fields.join(", ")),
        ));
    } else {
        log.append(TestResult::fail(
            category,
            label,
            FailureKind::NullField,
            format!("missing or null mapped fields: {}", offending.join(", ")),
        ));
    }
}

/// Integers compare exactly; a fractional side compares as `f64`, so `42`
/// and `42.0` agree.
fn values_agree(left: &Value, right: &Value) -> bool {
    let (Value::Number(l), Value::Number(r)) = (left, right) else {
        return left == right;
    };
    if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (l.as_u64(), r.as_u64()) {
        return l == r;
    }
    if l.is_f64() || r.is_f64() {
        return l.as_f64() == r.as_f64();
    }
    // a negative i64 against a u64 above i64::MAX
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{StatusPredicate, Suite};
    use crate::client::RequestSpec;
    use crate::schema::ValueKind;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Answers by path; records the order of calls.
    struct ScriptedTransport {
        outcomes: HashMap<String, CheckOutcome>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn respond(mut self, path: &str, status: u16, body: Value, elapsed_ms: u64) -> Self {
            let Value::Object(body) = body else {
                panic!("body must be an object");
            };
            self.outcomes.insert(
                path.to_string(),
                CheckOutcome::Response(HttpResponse {
                    status,
                    body,
                    elapsed_ms,
                }),
            );
            self
        }

        fn fail(mut self, path: &str, kind: TransportErrorKind, status: Option<u16>) -> Self {
            self.outcomes.insert(
                path.to_string(),
                CheckOutcome::Failure(TransportFailure {
                    kind,
                    message: format!("{kind} on {path}"),
                    elapsed_ms: Some(3),
                    status,
                }),
            );
            self
        }
    }

    impl Transport for ScriptedTransport {
        fn call(&self, request: &RequestSpec) -> CheckOutcome {
            self.calls.borrow_mut().push(request.path.clone());
            self.outcomes.get(&request.path).cloned().unwrap_or_else(|| {
                CheckOutcome::Failure(TransportFailure {
                    kind: TransportErrorKind::ConnectionError,
                    message: "connection refused".into(),
                    elapsed_ms: None,
                    status: None,
                })
            })
        }
    }

    fn registry() -> SchemaRegistry {
        let mut builder = SchemaRegistry::builder();
        builder
            .register(
                "Envelope",
                ["code", "data"],
                [],
                [("code", ValueKind::Number)],
            )
            .unwrap()
            .register(
                "Item",
                ["id", "name"],
                ["note"],
                [("id", ValueKind::Number), ("name", ValueKind::String)],
            )
            .unwrap();
        builder.build()
    }

    fn item_check(label: &str, path: &str) -> CheckDefinition {
        RequestCheck::new(label, RequestSpec::get(path))
            .schema(SchemaBinding::at("", "Envelope"))
            .schema(SchemaBinding::at("/data", "Item").with_naming())
            .into()
    }

    #[test]
    fn test_healthy_response_records_every_validator() {
        let registry = registry();
        let transport = ScriptedTransport::new().respond(
            "/item",
            200,
            json!({"code": 200, "data": {"id": 1, "name": "widget"}}),
            12,
        );
        let suite = Suite::new().category("items", [item_check("item", "/item")]);

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        assert!(!summary.is_aborted());
        // presence + types for both bindings, naming for the inner one
        assert_eq!(summary.log.len(), 5);
        assert!(summary.log.entries().iter().all(|r| r.success));
    }

    #[test]
    fn test_violations_are_all_reported() {
        let registry = registry();
        let transport = ScriptedTransport::new().respond(
            "/item",
            200,
            json!({"code": 200, "data": {"id": "1", "item_name": "widget"}}),
            12,
        );
        let suite = Suite::new().category("items", [item_check("item", "/item")]);

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let kinds: Vec<FailureKind> = summary
            .log
            .entries()
            .iter()
            .filter_map(|r| r.failure)
            .collect();
        assert_eq!(
            kinds,
            [
                FailureKind::MissingField,
                FailureKind::TypeMismatch,
                FailureKind::NamingViolation,
            ]
        );
        let missing = summary
            .log
            .entries()
            .iter()
            .find(|r| r.failure == Some(FailureKind::MissingField))
            .unwrap();
        assert!(missing.message.contains("name"));
    }

    #[test]
    fn test_transport_failure_does_not_stop_run() {
        let registry = registry();
        let transport = ScriptedTransport::new()
            .fail("/slow", TransportErrorKind::Timeout, None)
            .respond("/item", 200, json!({"code": 200, "data": {"id": 1, "name": "a"}}), 1);
        let suite = Suite::new().category(
            "items",
            [item_check("slow", "/slow"), item_check("item", "/item")],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let entries = summary.log.entries();
        assert_eq!(entries[0].failure, Some(FailureKind::Timeout));
        assert!(entries[0].message.contains("after 3ms"));
        assert_eq!(entries.len(), 6);
        assert_eq!(*transport.calls.borrow(), ["/slow", "/item"]);
    }

    #[test]
    fn test_unknown_schema_aborts_with_partial_log() {
        let registry = registry();
        let transport = ScriptedTransport::new()
            .respond("/ok", 404, json!({}), 1)
            .respond("/never", 200, json!({}), 1);
        let suite = Suite::new()
            .category(
                "first",
                [RequestCheck::new("ok", RequestSpec::get("/ok"))
                    .expect(StatusPredicate::Exact(404))
                    .into()],
            )
            .category(
                "second",
                [RequestCheck::new("broken", RequestSpec::get("/never"))
                    .schema(SchemaBinding::at("", "Nope"))
                    .into()],
            );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        assert_eq!(summary.log.len(), 1);
        assert_eq!(
            summary.aborted,
            Some(RunError::UnknownSchema {
                category: "second".into(),
                check: "broken".into(),
                schema: "Nope".into(),
            })
        );
        assert_eq!(*transport.calls.borrow(), ["/ok"]);
    }

    #[test]
    fn test_status_only_check_ignores_undecodable_body() {
        let registry = registry();
        let transport = ScriptedTransport::new()
            .fail("/missing", TransportErrorKind::DecodeError, Some(404));
        let suite = Suite::new().category(
            "errors",
            [RequestCheck::new("missing", RequestSpec::get("/missing"))
                .expect(StatusPredicate::Exact(404))
                .into()],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        assert_eq!(summary.log.len(), 1);
        assert!(summary.log.entries()[0].success);
    }

    #[test]
    fn test_unexpected_status_skips_body_but_checks_budget() {
        let registry = registry();
        let transport = ScriptedTransport::new().respond("/item", 500, json!({"error": "boom"}), 40);
        let suite = Suite::new().category(
            "items",
            [RequestCheck::new("item", RequestSpec::get("/item"))
                .schema(SchemaBinding::at("", "Envelope"))
                .budget_ms(10)
                .into()],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let kinds: Vec<Option<FailureKind>> =
            summary.log.entries().iter().map(|r| r.failure).collect();
        assert_eq!(
            kinds,
            [
                Some(FailureKind::UnexpectedStatus),
                Some(FailureKind::PerformanceBudgetExceeded),
            ]
        );
    }

    #[test]
    fn test_optional_target_absent_is_skipped() {
        let registry = registry();
        let transport =
            ScriptedTransport::new().respond("/list", 200, json!({"code": 0, "data": {"list": []}}), 1);
        let suite = Suite::new().category(
            "items",
            [
                RequestCheck::new("first", RequestSpec::get("/list"))
                    .schema(SchemaBinding::at("/data/list/0", "Item").optional())
                    .into(),
                RequestCheck::new("required", RequestSpec::get("/list"))
                    .schema(SchemaBinding::at("/data/list/0", "Item"))
                    .into(),
            ],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        assert_eq!(summary.log.len(), 1);
        assert_eq!(
            summary.log.entries()[0].failure,
            Some(FailureKind::MissingTarget)
        );
        assert_eq!(summary.log.entries()[0].check, "required");
    }

    #[test]
    fn test_non_null_names_every_offender() {
        let registry = registry();
        let transport = ScriptedTransport::new().respond(
            "/rec",
            200,
            json!({"data": {"a": 1, "b": null}}),
            1,
        );
        let suite = Suite::new().category(
            "mapping",
            [RequestCheck::new("mapping", RequestSpec::get("/rec"))
                .non_null("/data", ["a", "b", "c"])
                .into()],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let entry = &summary.log.entries()[0];
        assert_eq!(entry.failure, Some(FailureKind::NullField));
        assert!(entry.message.ends_with("b, c"));
    }

    #[test]
    fn test_cross_check_compares_numbers_by_value() {
        let registry = registry();
        let transport = ScriptedTransport::new()
            .respond("/stats", 200, json!({"data": {"total": 42}}), 1)
            .respond("/records", 200, json!({"data": {"total": 42.0}}), 1)
            .respond("/other", 200, json!({"data": {"total": 40}}), 1);
        let probe = |label: &str, path: &str| Probe::new(label, RequestSpec::get(path), "/data/total");
        let suite = Suite::new().category(
            "cross",
            [
                CrossCheck::new("agree", probe("stats", "/stats"), probe("records", "/records")).into(),
                CrossCheck::new("disagree", probe("stats", "/stats"), probe("other", "/other")).into(),
            ],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let entries = summary.log.entries();
        assert!(entries[0].success);
        assert_eq!(entries[1].failure, Some(FailureKind::CrossCheckMismatch));
        assert!(entries[1].message.contains("42"));
        assert!(entries[1].message.contains("40"));
    }

    #[test]
    fn test_budget_and_presence_are_judged_separately() {
        let registry = registry();
        let transport = ScriptedTransport::new().respond(
            "/item",
            200,
            json!({"code": 200, "data": {"id": 1}}),
            1500,
        );
        let suite = Suite::new().category(
            "items",
            [RequestCheck::new("item", RequestSpec::get("/item"))
                .schema(SchemaBinding::at("/data", "Item"))
                .budget_ms(2000)
                .into()],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let entries = summary.log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].failure, Some(FailureKind::MissingField));
        assert!(entries[0].message.contains("name"));
        assert!(entries[1].success);
        let budget = entries.last().unwrap();
        assert!(budget.success);
        assert!(budget.message.contains("1500ms"));
        assert!(budget.message.contains("2000ms"));
    }

    #[test]
    fn test_snake_case_duplicate_passes_presence_but_fails_naming() {
        let registry = registry();
        let transport = ScriptedTransport::new().respond(
            "/item",
            200,
            json!({"code": 200, "data": {"id": 1, "name": "widget", "item_name": "widget"}}),
            1,
        );
        let suite = Suite::new().category("items", [item_check("item", "/item")]);

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let failures: Vec<&TestResult> =
            summary.log.entries().iter().filter(|r| !r.success).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].failure, Some(FailureKind::NamingViolation));
        assert!(failures[0].message.contains("item_name"));
    }

    #[test]
    fn test_cross_check_integers_compare_exactly() {
        let registry = registry();
        let transport = ScriptedTransport::new()
            .respond("/stats", 200, json!({"data": {"total": 9_007_199_254_740_993_u64}}), 1)
            .respond("/records", 200, json!({"data": {"total": 9_007_199_254_740_992_u64}}), 1)
            .respond("/huge", 200, json!({"data": {"total": u64::MAX}}), 1)
            .respond("/negative", 200, json!({"data": {"total": -1}}), 1);
        let probe = |path: &str| Probe::new(path, RequestSpec::get(path), "/data/total");
        let suite = Suite::new().category(
            "cross",
            [
                CrossCheck::new("adjacent", probe("/stats"), probe("/records")).into(),
                CrossCheck::new("same", probe("/huge"), probe("/huge")).into(),
                CrossCheck::new("signs", probe("/negative"), probe("/huge")).into(),
            ],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        let entries = summary.log.entries();
        assert_eq!(entries[0].failure, Some(FailureKind::CrossCheckMismatch));
        assert!(entries[1].success);
        assert_eq!(entries[2].failure, Some(FailureKind::CrossCheckMismatch));
    }

    #[test]
    fn test_values_agree_rules() {
        assert!(values_agree(&json!(42), &json!(42.0)));
        assert!(values_agree(&json!(-7), &json!(-7)));
        assert!(!values_agree(&json!(1.5), &json!(1)));
        assert!(!values_agree(&json!("42"), &json!(42)));
        assert!(values_agree(&json!("a"), &json!("a")));
    }

    #[test]
    fn test_cross_check_probe_failure_kind() {
        let registry = registry();
        let transport = ScriptedTransport::new().respond("/stats", 503, json!({}), 1);
        let probe = |path: &str| Probe::new(path, RequestSpec::get(path), "/data/total");
        let suite = Suite::new().category(
            "cross",
            [CrossCheck::new("totals", probe("/stats"), probe("/records")).into()],
        );

        let summary = TestRunner::new(&registry, &transport).run(&suite);
        assert_eq!(summary.log.len(), 1);
        assert_eq!(
            summary.log.entries()[0].failure,
            Some(FailureKind::UnexpectedStatus)
        );
    }
}
