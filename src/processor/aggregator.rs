use std::collections::BTreeMap;

use crate::models::{AggregateRow, CleanOrderRecord, HourRow, RevenueCostRow};

/// The SKU count shown by each top-N chart.
const TOP_N: usize = 10;

/// The six chart queries. Each one is a pure read over the cleaned table and
/// recomputes from scratch; none shares state with the others.
///
/// Top-N ordering is descending by the primary measure with ties broken by
/// group key ascending: groups accumulate in a `BTreeMap` (key order) and the
/// measure sort is stable, so equal measures keep their key order. That makes
/// every table reproducible for the same input.
pub struct Aggregator;

impl Aggregator {
    /// Ten best-selling SKUs by summed quantity.
    pub fn top_selling_by_qty(&self, records: &[CleanOrderRecord]) -> Vec<AggregateRow> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.sku.as_str()).or_insert(0.0) += record.quantity_sold;
        }
        top_n_rows(totals, TOP_N)
    }

    /// Ten highest-revenue SKUs with their summed revenue and cost.
    pub fn top_revenue_vs_cost(&self, records: &[CleanOrderRecord]) -> Vec<RevenueCostRow> {
        let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        for record in records {
            let entry = totals.entry(record.sku.as_str()).or_insert((0.0, 0.0));
            entry.0 += record.total_revenue;
            entry.1 += record.total_cost;
        }

        let mut rows: Vec<RevenueCostRow> = totals
            .into_iter()
            .map(|(sku, (total_revenue, total_cost))| RevenueCostRow {
                sku: sku.to_string(),
                total_revenue,
                total_cost,
            })
            .collect();
        rows.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
        rows.truncate(TOP_N);
        rows
    }

    /// Ten most profitable suppliers. Rows without a supplier_id are skipped
    /// here; they still count in every other view.
    pub fn top_suppliers_by_profit(&self, records: &[CleanOrderRecord]) -> Vec<AggregateRow> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            let Some(supplier_id) = record.supplier_id.as_deref() else {
                continue;
            };
            *totals.entry(supplier_id).or_insert(0.0) += record.profit;
        }
        top_n_rows(totals, TOP_N)
    }

    /// Order-line counts per hour of day, ascending by hour. Rows whose
    /// timestamp failed to parse are excluded from this view only, and hours
    /// with no orders are omitted rather than zero-filled.
    pub fn orders_by_hour(&self, records: &[CleanOrderRecord]) -> Vec<HourRow> {
        let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
        for record in records {
            if let Some(hour) = record.hour_of_day {
                *counts.entry(hour).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .map(|(hour, orders)| HourRow { hour, orders })
            .collect()
    }

    /// Quantity sold per item category, key-ascending, no limit. The chart
    /// presents these as proportions of the whole. Rows without a category
    /// are skipped here.
    pub fn sales_by_category(&self, records: &[CleanOrderRecord]) -> Vec<AggregateRow> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            let Some(category) = record.item_category.as_deref() else {
                continue;
            };
            *totals.entry(category).or_insert(0.0) += record.quantity_sold;
        }
        totals
            .into_iter()
            .map(|(key, value)| AggregateRow {
                key: key.to_string(),
                value,
            })
            .collect()
    }

    /// Ten highest-revenue SKUs, revenue only.
    pub fn top_products_by_revenue(&self, records: &[CleanOrderRecord]) -> Vec<AggregateRow> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.sku.as_str()).or_insert(0.0) += record.total_revenue;
        }
        top_n_rows(totals, TOP_N)
    }
}

fn top_n_rows(totals: BTreeMap<&str, f64>, limit: usize) -> Vec<AggregateRow> {
    let mut rows: Vec<AggregateRow> = totals
        .into_iter()
        .map(|(key, value)| AggregateRow {
            key: key.to_string(),
            value,
        })
        .collect();
    // Stable sort over a key-ordered input: ties stay in key order.
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_row(
        order_id: &str,
        sku: &str,
        supplier_id: Option<&str>,
        category: Option<&str>,
        quantity: f64,
        selling: f64,
        purchasing: f64,
        hour: Option<u32>,
    ) -> CleanOrderRecord {
        CleanOrderRecord {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            supplier_id: supplier_id.map(str::to_string),
            item_category: category.map(str::to_string),
            quantity_sold: quantity,
            selling_price_per_unit: selling,
            purchasing_price_per_unit: purchasing,
            order_created: None,
            hour_of_day: hour,
            profit: (selling - purchasing) * quantity,
            total_revenue: selling * quantity,
            total_cost: purchasing * quantity,
        }
    }

    #[test]
    fn test_worked_example_supplier_and_hour_tables() {
        let records = vec![
            clean_row("1", "A", Some("S1"), None, 2.0, 10.0, 6.0, Some(5)),
            clean_row("2", "A", Some("S1"), None, 3.0, 10.0, 6.0, Some(5)),
        ];
        let aggregator = Aggregator;

        let suppliers = aggregator.top_suppliers_by_profit(&records);
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].key, "S1");
        assert_eq!(suppliers[0].value, 20.0);

        let hours = aggregator.orders_by_hour(&records);
        assert_eq!(hours, vec![HourRow { hour: 5, orders: 2 }]);
    }

    #[test]
    fn test_top_selling_sums_per_sku_and_sorts_descending() {
        let records = vec![
            clean_row("1", "A", None, None, 2.0, 1.0, 0.5, None),
            clean_row("2", "B", None, None, 7.0, 1.0, 0.5, None),
            clean_row("3", "A", None, None, 4.0, 1.0, 0.5, None),
        ];

        let rows = Aggregator.top_selling_by_qty(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "B");
        assert_eq!(rows[0].value, 7.0);
        assert_eq!(rows[1].key, "A");
        assert_eq!(rows[1].value, 6.0);
    }

    #[test]
    fn test_top_n_truncates_to_ten_with_key_ascending_ties() {
        // Twelve SKUs with the same quantity: the first ten in key order win.
        let records: Vec<CleanOrderRecord> = (0..12)
            .map(|i| {
                clean_row(
                    &format!("{}", i),
                    &format!("SKU-{:02}", i),
                    None,
                    None,
                    5.0,
                    1.0,
                    0.5,
                    None,
                )
            })
            .collect();

        let rows = Aggregator.top_selling_by_qty(&records);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].key, "SKU-00");
        assert_eq!(rows[9].key, "SKU-09");
    }

    #[test]
    fn test_revenue_vs_cost_sorted_by_revenue() {
        let records = vec![
            clean_row("1", "A", None, None, 1.0, 5.0, 2.0, None),
            clean_row("2", "B", None, None, 1.0, 20.0, 15.0, None),
            clean_row("3", "B", None, None, 1.0, 20.0, 15.0, None),
        ];

        let rows = Aggregator.top_revenue_vs_cost(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "B");
        assert_eq!(rows[0].total_revenue, 40.0);
        assert_eq!(rows[0].total_cost, 30.0);
        assert_eq!(rows[1].sku, "A");
    }

    #[test]
    fn test_rows_without_supplier_skipped_only_in_supplier_view() {
        let records = vec![
            clean_row("1", "A", None, Some("Snacks"), 2.0, 10.0, 6.0, None),
            clean_row("2", "B", Some("S2"), Some("Snacks"), 1.0, 10.0, 6.0, None),
        ];
        let aggregator = Aggregator;

        let suppliers = aggregator.top_suppliers_by_profit(&records);
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].key, "S2");

        // the supplier-less row still counts everywhere else
        assert_eq!(aggregator.top_selling_by_qty(&records).len(), 2);
        assert_eq!(aggregator.sales_by_category(&records)[0].value, 3.0);
    }

    #[test]
    fn test_hourly_view_drops_null_hours_and_keys_stay_in_range() {
        let records = vec![
            clean_row("1", "A", None, None, 1.0, 2.0, 1.0, Some(23)),
            clean_row("2", "B", None, None, 1.0, 2.0, 1.0, None),
            clean_row("3", "C", None, None, 1.0, 2.0, 1.0, Some(0)),
            clean_row("4", "D", None, None, 1.0, 2.0, 1.0, Some(23)),
        ];

        let hours = Aggregator.orders_by_hour(&records);
        assert_eq!(
            hours,
            vec![
                HourRow { hour: 0, orders: 1 },
                HourRow { hour: 23, orders: 2 },
            ]
        );
        assert!(hours.iter().all(|row| row.hour <= 23));
    }

    #[test]
    fn test_sales_by_category_is_key_ordered() {
        let records = vec![
            clean_row("1", "A", None, Some("Snacks"), 2.0, 1.0, 0.5, None),
            clean_row("2", "B", None, Some("Beverages"), 3.0, 1.0, 0.5, None),
            clean_row("3", "C", None, Some("Snacks"), 1.0, 1.0, 0.5, None),
        ];

        let rows = Aggregator.sales_by_category(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "Beverages");
        assert_eq!(rows[0].value, 3.0);
        assert_eq!(rows[1].key, "Snacks");
        assert_eq!(rows[1].value, 3.0);
    }

    #[test]
    fn test_top_products_by_revenue() {
        let records = vec![
            clean_row("1", "A", None, None, 2.0, 10.0, 6.0, None),
            clean_row("2", "B", None, None, 1.0, 50.0, 20.0, None),
            clean_row("3", "A", None, None, 1.0, 10.0, 6.0, None),
        ];

        let rows = Aggregator.top_products_by_revenue(&records);
        assert_eq!(rows[0].key, "B");
        assert_eq!(rows[0].value, 50.0);
        assert_eq!(rows[1].key, "A");
        assert_eq!(rows[1].value, 30.0);
    }

    #[test]
    fn test_empty_table_yields_empty_views() {
        let aggregator = Aggregator;
        assert!(aggregator.top_selling_by_qty(&[]).is_empty());
        assert!(aggregator.top_revenue_vs_cost(&[]).is_empty());
        assert!(aggregator.top_suppliers_by_profit(&[]).is_empty());
        assert!(aggregator.orders_by_hour(&[]).is_empty());
        assert!(aggregator.sales_by_category(&[]).is_empty());
        assert!(aggregator.top_products_by_revenue(&[]).is_empty());
    }
}
