use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// One order line exactly as it appears in the input CSV. Identifier and
/// numeric cells that are blank or unparseable come through as `None`; the
/// cleaning stage decides what to do with them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderRecord {
    #[serde(deserialize_with = "de_opt_string")]
    pub order_id: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    pub sku: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    pub supplier_id: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    pub item_category: Option<String>,
    #[serde(deserialize_with = "de_opt_f64")]
    pub quantity_sold: Option<f64>,
    #[serde(deserialize_with = "de_opt_f64")]
    pub selling_price_per_unit: Option<f64>,
    #[serde(deserialize_with = "de_opt_f64")]
    pub purchasing_price_per_unit: Option<f64>,
    #[serde(deserialize_with = "de_opt_string")]
    pub order_created: Option<String>,
}

/// An order line after deduplication, null filling, timestamp parsing and
/// derivation. The critical identifier and numeric fields are guaranteed
/// present; timestamps stay optional because unparseable dates are tolerated.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOrderRecord {
    pub order_id: String,
    pub sku: String,
    pub supplier_id: Option<String>,
    pub item_category: Option<String>,
    pub quantity_sold: f64,
    pub selling_price_per_unit: f64,
    pub purchasing_price_per_unit: f64,
    pub order_created: Option<NaiveDateTime>,
    pub hour_of_day: Option<u32>,
    pub profit: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
}

/// Summary scalars folded over the whole cleaned table. Degenerate inputs
/// (zero revenue, zero distinct orders) produce 0.0, never a division error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin: f64,
    pub avg_order_value: f64,
}

/// One group-by result row: a group key with a single summed measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: String,
    pub value: f64,
}

/// Per-SKU revenue and cost totals for the grouped revenue-vs-cost chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueCostRow {
    pub sku: String,
    pub total_revenue: f64,
    pub total_cost: f64,
}

/// Order count for one hour of the day (0-23).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRow {
    pub hour: u32,
    pub orders: u64,
}

/// Everything the dashboard page needs: the KPI scalars plus the six chart
/// tables. This struct is the whole contract between the pipeline and the
/// renderer; the renderer never reaches back into the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub generated: String,
    pub title: String,
    pub kpis: KpiSummary,
    pub top_selling_by_qty: Vec<AggregateRow>,
    pub top_revenue_vs_cost: Vec<RevenueCostRow>,
    pub top_suppliers_by_profit: Vec<AggregateRow>,
    pub orders_by_hour: Vec<HourRow>,
    pub sales_by_category: Vec<AggregateRow>,
    pub top_products_by_revenue: Vec<AggregateRow>,
}

/// Blank cells become `None` instead of an empty string.
fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// Forgiving numeric cell parser: blank or non-numeric text becomes `None`
/// rather than failing the row, so one bad cell never aborts the load.
fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|s| s.trim().parse::<f64>().ok()))
}
