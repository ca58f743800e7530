//! Interface contracts for the sales service.
//!
//! Mirrors the front-end's TypeScript interfaces: the response envelope,
//! the paginated payload, sales records, aggregate stats and chart data.

use super::{SchemaError, SchemaRegistry, ValueKind};

pub const API_RESPONSE: &str = "ApiResponse";
pub const PAGE_RESPONSE: &str = "PageResponse";
pub const SALES_RECORD: &str = "SalesRecord";
pub const SALES_STATS: &str = "SalesStats";
pub const SALES_CHART_DATA: &str = "SalesChartData";
pub const CHART_SERIES: &str = "ChartSeries";

const NO_FIELDS: [&str; 0] = [];

/// Build the registry of sales service contracts.
pub fn registry() -> Result<SchemaRegistry, SchemaError> {
    use ValueKind::{Array, Number, String};

    let mut builder = SchemaRegistry::builder();

    builder.register(
        API_RESPONSE,
        ["code", "message", "data"],
        NO_FIELDS,
        [("code", Number), ("message", String)],
    )?;

    builder.register(
        PAGE_RESPONSE,
        ["list", "total", "page", "pageSize"],
        ["totalPages", "isEmpty"],
        [
            ("list", Array),
            ("total", Number),
            ("page", Number),
            ("pageSize", Number),
        ],
    )?;

    builder.register(
        SALES_RECORD,
        [
            "id",
            "orderNumber",
            "customerId",
            "productId",
            "salesStaffId",
            "salesAmount",
            "quantity",
            "unitPrice",
            "orderDate",
            "status",
            "paymentStatus",
            "createdAt",
            "updatedAt",
            "customerName",
            "productName",
            "staffName",
        ],
        [
            "discountAmount",
            "deliveryDate",
            "paymentMethod",
            "region",
            "channel",
            "notes",
            "customerPhone",
        ],
        [
            ("id", Number),
            ("salesAmount", Number),
            ("quantity", Number),
            ("unitPrice", Number),
            ("orderNumber", String),
            ("customerName", String),
            ("productName", String),
            ("staffName", String),
            ("status", String),
            ("paymentStatus", String),
        ],
    )?;

    builder.register(
        SALES_STATS,
        [
            "totalSalesAmount",
            "totalOrders",
            "avgOrderAmount",
            "totalQuantity",
            "newCustomers",
            "activeCustomers",
        ],
        ["growthRate"],
        [
            ("totalSalesAmount", Number),
            ("totalOrders", Number),
            ("avgOrderAmount", Number),
            ("totalQuantity", Number),
            ("newCustomers", Number),
            ("activeCustomers", Number),
        ],
    )?;

    builder.register(
        SALES_CHART_DATA,
        ["categories", "series"],
        NO_FIELDS,
        [("categories", Array), ("series", Array)],
    )?;

    builder.register(
        CHART_SERIES,
        ["name", "data"],
        NO_FIELDS,
        [("name", String), ("data", Array)],
    )?;

    Ok(builder.build())
}
