use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::models::{CleanOrderRecord, KpiSummary, RawOrderRecord};

/// Timestamp layouts accepted for `order_created`, tried in order. Anything
/// else becomes a null timestamp, never an error.
const TIMESTAMP_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub struct RecordCleaner;

impl RecordCleaner {
    /// Run the full cleaning and derivation pass over a raw order table.
    ///
    /// Steps, in order: exact-duplicate removal, null filling (quantity to 0,
    /// unit prices to the column median of the post-dedup table), timestamp
    /// parsing, dropping rows without an `order_id` or `sku`, and computing
    /// the derived profit/revenue/cost columns. Every step is total: bad
    /// cells degrade locally instead of failing the pass.
    pub fn clean(&self, raw: Vec<RawOrderRecord>) -> Vec<CleanOrderRecord> {
        let total_rows = raw.len();
        let deduped = self.drop_exact_duplicates(raw);
        let duplicates_removed = total_rows - deduped.len();

        // Medians come from the deduplicated table, before any substitution,
        // so a filled value never feeds back into the fill statistic.
        let selling_median = median(deduped.iter().filter_map(|r| r.selling_price_per_unit));
        let purchasing_median = median(deduped.iter().filter_map(|r| r.purchasing_price_per_unit));

        let mut dropped_missing_ids = 0usize;
        let mut unparseable_timestamps = 0usize;
        let mut cleaned = Vec::with_capacity(deduped.len());

        for row in deduped {
            let (Some(order_id), Some(sku)) = (row.order_id, row.sku) else {
                dropped_missing_ids += 1;
                continue;
            };

            let quantity_sold = row.quantity_sold.unwrap_or(0.0);
            let selling_price_per_unit = row.selling_price_per_unit.unwrap_or(selling_median);
            let purchasing_price_per_unit =
                row.purchasing_price_per_unit.unwrap_or(purchasing_median);

            let order_created = row.order_created.as_deref().and_then(parse_timestamp);
            if row.order_created.is_some() && order_created.is_none() {
                unparseable_timestamps += 1;
            }

            cleaned.push(CleanOrderRecord {
                order_id,
                sku,
                supplier_id: row.supplier_id,
                item_category: row.item_category,
                quantity_sold,
                selling_price_per_unit,
                purchasing_price_per_unit,
                order_created,
                hour_of_day: order_created.map(|dt| dt.hour()),
                profit: (selling_price_per_unit - purchasing_price_per_unit) * quantity_sold,
                total_revenue: selling_price_per_unit * quantity_sold,
                total_cost: purchasing_price_per_unit * quantity_sold,
            });
        }

        info!(
            "Cleaning summary: {} rows in, {} duplicates removed, {} dropped for missing order_id/sku, {} kept",
            total_rows,
            duplicates_removed,
            dropped_missing_ids,
            cleaned.len()
        );
        if unparseable_timestamps > 0 {
            warn!(
                "{} rows have an unparseable order_created; they keep a null timestamp and are skipped by the hourly view only",
                unparseable_timestamps
            );
        }

        cleaned
    }

    /// Fold the four KPI scalars over the cleaned table. Zero revenue or
    /// zero distinct orders yield 0.0 for the affected ratio.
    pub fn kpi_summary(&self, records: &[CleanOrderRecord]) -> KpiSummary {
        let total_revenue: f64 = records.iter().map(|r| r.total_revenue).sum();
        let total_cost: f64 = records.iter().map(|r| r.total_cost).sum();
        let total_profit = total_revenue - total_cost;

        let profit_margin = if total_revenue == 0.0 {
            0.0
        } else {
            total_profit / total_revenue * 100.0
        };

        let distinct_orders = records
            .iter()
            .map(|r| r.order_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let avg_order_value = if distinct_orders == 0 {
            0.0
        } else {
            total_revenue / distinct_orders as f64
        };

        KpiSummary {
            total_revenue,
            total_profit,
            profit_margin,
            avg_order_value,
        }
    }

    /// Collapse rows that are identical across all eight raw fields, keeping
    /// the first occurrence. Near-duplicates (any field differing) survive.
    fn drop_exact_duplicates(&self, rows: Vec<RawOrderRecord>) -> Vec<RawOrderRecord> {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut unique = Vec::with_capacity(rows.len());
        for row in rows {
            if seen.insert(row_key(&row)) {
                unique.push(row);
            }
        }
        unique
    }
}

type RowKey = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<u64>,
    Option<u64>,
    Option<u64>,
    Option<String>,
);

// Floats are keyed by bit pattern so null and negative-zero cells hash
// deterministically.
fn row_key(row: &RawOrderRecord) -> RowKey {
    (
        row.order_id.clone(),
        row.sku.clone(),
        row.supplier_id.clone(),
        row.item_category.clone(),
        row.quantity_sold.map(f64::to_bits),
        row.selling_price_per_unit.map(f64::to_bits),
        row.purchasing_price_per_unit.map(f64::to_bits),
        row.order_created.clone(),
    )
}

/// Median of the non-null values of a column; an entirely null column
/// medians to 0.0. Even-length inputs take the mean of the two middle
/// values.
fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Parse an `order_created` cell. Accepts RFC 3339 and the common
/// ISO-without-zone layouts, plus a bare date (midnight). Returns `None` for
/// anything else.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for layout in TIMESTAMP_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}
