//! The built-in suite for the sales management service.

use super::{CheckDefinition, CrossCheck, Probe, RequestCheck, SchemaBinding, StatusPredicate, Suite};
use crate::client::RequestSpec;
use crate::schema::sales::{
    API_RESPONSE, CHART_SERIES, PAGE_RESPONSE, SALES_CHART_DATA, SALES_RECORD, SALES_STATS,
};
use chrono::{Days, Local, NaiveDate};

pub const RECORDS_PATH: &str = "/api/sales/records";
pub const STATS_PATH: &str = "/api/sales/stats";
pub const TRENDS_PATH: &str = "/api/sales/charts/trends";
pub const DISTRIBUTION_PATH: &str = "/api/sales/charts/distribution";

pub const RECORDS_CONTRACT: &str = "records contract";
pub const STATS_CONTRACT: &str = "stats contract";
pub const CHARTS_CONTRACT: &str = "charts contract";
pub const ERROR_HANDLING: &str = "error handling";
pub const DATE_RANGE: &str = "date range filtering";
pub const FIELD_MAPPING: &str = "field-mapping cross-check";
pub const PERFORMANCE: &str = "performance";

const DISTRIBUTION_TYPES: [&str; 3] = ["product", "region", "channel"];

/// Fields the frontend maps directly onto table columns.
const MAPPED_RECORD_FIELDS: [&str; 5] = [
    "customerName",
    "productName",
    "staffName",
    "salesAmount",
    "orderNumber",
];

/// Default suite with the date range window ending today (local time).
pub fn default_suite_for_today() -> Suite {
    default_suite(Local::now().date_naive())
}

/// Default suite with the date range window ending on `today`.
pub fn default_suite(today: NaiveDate) -> Suite {
    let start = today.checked_sub_days(Days::new(7)).unwrap_or(today);
    let start = start.format("%Y-%m-%d").to_string();
    let end = today.format("%Y-%m-%d").to_string();

    Suite::new()
        .category(RECORDS_CONTRACT, records_contract())
        .category(STATS_CONTRACT, stats_contract(&start, &end))
        .category(CHARTS_CONTRACT, charts_contract())
        .category(ERROR_HANDLING, error_handling())
        .category(DATE_RANGE, date_range(&start, &end))
        .category(FIELD_MAPPING, field_mapping())
        .category(PERFORMANCE, performance())
}

fn records_page() -> RequestSpec {
    RequestSpec::get(RECORDS_PATH)
        .query("page", "1")
        .query("pageSize", "20")
}

/// Envelope, page and first record, with naming lint on every level.
fn page_check(label: &str, request: RequestSpec) -> CheckDefinition {
    RequestCheck::new(label, request)
        .schema(SchemaBinding::at("", API_RESPONSE).with_naming())
        .schema(SchemaBinding::at("/data", PAGE_RESPONSE).with_naming())
        .schema(
            SchemaBinding::at("/data/list/0", SALES_RECORD)
                .with_naming()
                .optional(),
        )
        .into()
}

fn records_contract() -> Vec<CheckDefinition> {
    vec![
        page_check("records listing", records_page()),
        page_check("records keyword search", records_page().query("keyword", "test")),
        page_check("records status filter", records_page().query("status", "pending")),
    ]
}

fn stats_check(label: &str, request: RequestSpec) -> CheckDefinition {
    RequestCheck::new(label, request)
        .schema(SchemaBinding::at("", API_RESPONSE).with_naming())
        .schema(SchemaBinding::at("/data", SALES_STATS).with_naming())
        .into()
}

fn stats_contract(start: &str, end: &str) -> Vec<CheckDefinition> {
    vec![
        stats_check("stats summary", RequestSpec::get(STATS_PATH)),
        stats_check(
            "stats date range",
            RequestSpec::get(STATS_PATH)
                .query("startDate", start)
                .query("endDate", end),
        ),
    ]
}

fn chart_check(label: &str, request: RequestSpec) -> RequestCheck {
    RequestCheck::new(label, request)
        .schema(SchemaBinding::at("", API_RESPONSE).with_naming())
        .schema(SchemaBinding::at("/data", SALES_CHART_DATA).with_naming())
}

fn charts_contract() -> Vec<CheckDefinition> {
    let mut checks: Vec<CheckDefinition> = vec![
        chart_check(
            "trends chart",
            RequestSpec::get(TRENDS_PATH).query("groupBy", "day"),
        )
        .schema(SchemaBinding::at("/data/series/0", CHART_SERIES).optional())
        .into(),
    ];
    checks.extend(DISTRIBUTION_TYPES.iter().map(|kind| {
        chart_check(
            &format!("{kind} distribution chart"),
            RequestSpec::get(DISTRIBUTION_PATH).query("type", *kind),
        )
        .into()
    }));
    checks
}

fn status_check(label: &str, request: RequestSpec, expect: StatusPredicate) -> CheckDefinition {
    RequestCheck::new(label, request).expect(expect).into()
}

fn error_handling() -> Vec<CheckDefinition> {
    vec![
        status_check(
            "unknown record id",
            RequestSpec::get(format!("{RECORDS_PATH}/999999")),
            StatusPredicate::Exact(404),
        ),
        status_check(
            "negative page number",
            RequestSpec::get(RECORDS_PATH).query("page", "-1"),
            StatusPredicate::Exact(400),
        ),
        status_check(
            "malformed start date",
            RequestSpec::get(RECORDS_PATH).query("startDate", "invalid-date"),
            StatusPredicate::Exact(400),
        ),
        status_check(
            "zero page size",
            RequestSpec::get(RECORDS_PATH).query("pageSize", "0"),
            StatusPredicate::Below(500),
        ),
        status_check(
            "unknown distribution type",
            RequestSpec::get(DISTRIBUTION_PATH).query("type", "invalid"),
            StatusPredicate::Below(500),
        ),
    ]
}

fn date_range(start: &str, end: &str) -> Vec<CheckDefinition> {
    let ranged = |path: &str| {
        RequestSpec::get(path)
            .query("startDate", start)
            .query("endDate", end)
    };
    vec![
        stats_check("stats last 7 days", ranged(STATS_PATH)),
        page_check(
            "records last 7 days",
            ranged(RECORDS_PATH).query("page", "1").query("pageSize", "20"),
        ),
        chart_check("trends last 7 days", ranged(TRENDS_PATH)).into(),
        chart_check(
            "distribution last 7 days",
            ranged(DISTRIBUTION_PATH).query("type", "product"),
        )
        .into(),
    ]
}

fn field_mapping() -> Vec<CheckDefinition> {
    let single_record = || {
        RequestSpec::get(RECORDS_PATH)
            .query("page", "1")
            .query("pageSize", "1")
    };
    vec![
        RequestCheck::new("record field mapping", single_record())
            .non_null("/data/list/0", MAPPED_RECORD_FIELDS)
            .into(),
        CrossCheck::new(
            "stats total matches records total",
            Probe::new("stats totalOrders", RequestSpec::get(STATS_PATH), "/data/totalOrders"),
            Probe::new("records total", single_record(), "/data/total"),
        )
        .into(),
    ]
}

fn timed(label: &str, request: RequestSpec, budget_ms: u64) -> CheckDefinition {
    RequestCheck::new(label, request)
        .schema(SchemaBinding::at("", API_RESPONSE))
        .budget_ms(budget_ms)
        .into()
}

fn performance() -> Vec<CheckDefinition> {
    vec![
        timed("records response time", records_page(), 2000),
        timed("stats response time", RequestSpec::get(STATS_PATH), 1000),
        timed("trends response time", RequestSpec::get(TRENDS_PATH), 3000),
        timed(
            "distribution response time",
            RequestSpec::get(DISTRIBUTION_PATH).query("type", "product"),
            3000,
        ),
    ]
}
