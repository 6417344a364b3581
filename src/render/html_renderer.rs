use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::DashboardData;

/// Renders the finished dashboard page. This is a pure consumer of
/// `DashboardData`: the whole dataset is serialized once into a JSON blob
/// spliced into a static template, and the charts are drawn client-side, so
/// the output file is self-contained apart from the Plotly CDN script.
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn render_page(&self, data: &DashboardData) -> Result<String> {
        let blob =
            serde_json::to_string(data).context("Failed to serialize dashboard data to JSON")?;
        Ok(TEMPLATE.replace("__DASHBOARD_DATA__", &blob))
    }

    pub fn write_page(&self, path: &str, html: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory '{}'", parent.display())
                })?;
            }
        }
        fs::write(path, html).with_context(|| format!("Failed to write dashboard to '{}'", path))
    }
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sales Dashboard</title>
<script src="https://cdn.plot.ly/plotly-2.32.0.min.js"></script>
<style>
  body { margin: 0; padding: 1.5rem; background: #f4f6f8; font-family: "Segoe UI", Helvetica, Arial, sans-serif; }
  h2.page-title { text-align: center; font-weight: bold; color: #3d7c98; margin: 0 0 1.5rem; }
  .kpi-row { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; margin-bottom: 1.5rem; }
  .kpi-card { background: #fff; border-radius: 0.5rem; box-shadow: 0 0.25rem 0.75rem rgba(0,0,0,0.08); padding: 1rem 1.25rem; }
  .kpi-card h4 { margin: 0 0 0.5rem; font-size: 1rem; color: #343a40; }
  .kpi-card p { margin: 0; font-size: 1.5em; }
  #kpi-revenue { color: #28a745; }
  #kpi-margin { color: #17a2b8; }
  #kpi-aov { color: #ffc107; }
  .chart-grid { display: grid; grid-template-columns: repeat(2, 1fr); gap: 1rem; }
  .chart { background: #fff; border-radius: 0.5rem; box-shadow: 0 0.25rem 0.75rem rgba(0,0,0,0.08); min-height: 420px; }
  @media (max-width: 900px) { .kpi-row, .chart-grid { grid-template-columns: 1fr; } }
  footer { margin-top: 1rem; text-align: right; font-size: 0.75rem; color: #6c757d; }
</style>
</head>
<body>
<h2 class="page-title" id="page-title">Sales Dashboard</h2>

<div class="kpi-row">
  <div class="kpi-card"><h4>Total Revenue</h4><p id="kpi-revenue"></p></div>
  <div class="kpi-card"><h4>Profit Margin</h4><p id="kpi-margin"></p></div>
  <div class="kpi-card"><h4>Average Order Value</h4><p id="kpi-aov"></p></div>
</div>

<div class="chart-grid">
  <div class="chart" id="chart-top-qty"></div>
  <div class="chart" id="chart-revenue-cost"></div>
  <div class="chart" id="chart-suppliers"></div>
  <div class="chart" id="chart-hours"></div>
  <div class="chart" id="chart-categories"></div>
  <div class="chart" id="chart-top-revenue"></div>
</div>

<footer id="generated-at"></footer>

<script id="dashboard-data" type="application/json">__DASHBOARD_DATA__</script>
<script>
  const data = JSON.parse(document.getElementById('dashboard-data').textContent);
  const money = v => '$' + v.toLocaleString('en-US', { minimumFractionDigits: 2, maximumFractionDigits: 2 });

  document.title = data.title;
  document.getElementById('page-title').textContent = data.title;
  document.getElementById('kpi-revenue').textContent = money(data.kpis.total_revenue);
  document.getElementById('kpi-margin').textContent = data.kpis.profit_margin.toFixed(2) + '%';
  document.getElementById('kpi-aov').textContent = money(data.kpis.avg_order_value);
  document.getElementById('generated-at').textContent = 'Generated ' + data.generated;

  const layout = title => ({ title: { text: title }, margin: { t: 60, r: 20, b: 80, l: 60 } });
  const config = { responsive: true, displaylogo: false };

  Plotly.newPlot('chart-top-qty', [{
    type: 'bar',
    x: data.top_selling_by_qty.map(r => r.key),
    y: data.top_selling_by_qty.map(r => r.value),
    marker: { color: '#3d7c98' },
  }], layout('Top 10 Selling Products by Quantity Sold'), config);

  Plotly.newPlot('chart-revenue-cost', [
    {
      type: 'bar', name: 'Revenue',
      x: data.top_revenue_vs_cost.map(r => r.sku),
      y: data.top_revenue_vs_cost.map(r => r.total_revenue),
      marker: { color: '#28a745' },
    },
    {
      type: 'bar', name: 'Cost',
      x: data.top_revenue_vs_cost.map(r => r.sku),
      y: data.top_revenue_vs_cost.map(r => r.total_cost),
      marker: { color: '#dc3545' },
    },
  ], Object.assign(layout('Top 10 Products: Revenue vs Cost'), { barmode: 'group' }), config);

  Plotly.newPlot('chart-suppliers', [{
    type: 'bar',
    x: data.top_suppliers_by_profit.map(r => r.key),
    y: data.top_suppliers_by_profit.map(r => r.value),
    marker: { color: '#17a2b8' },
  }], layout('Top 10 Suppliers by Profit'), config);

  Plotly.newPlot('chart-hours', [{
    type: 'scatter', mode: 'lines+markers',
    x: data.orders_by_hour.map(r => r.hour),
    y: data.orders_by_hour.map(r => r.orders),
    line: { color: '#3d7c98' },
  }], Object.assign(layout('Number of Orders by Hour of the Day'), {
    xaxis: { dtick: 1, range: [-0.5, 23.5] },
  }), config);

  Plotly.newPlot('chart-categories', [{
    type: 'pie',
    labels: data.sales_by_category.map(r => r.key),
    values: data.sales_by_category.map(r => r.value),
  }], layout('Sales by Item Category'), config);

  Plotly.newPlot('chart-top-revenue', [{
    type: 'bar',
    x: data.top_products_by_revenue.map(r => r.key),
    y: data.top_products_by_revenue.map(r => r.value),
    marker: { color: '#ffc107' },
  }], layout('Top 10 Selling Products by Revenue'), config);
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateRow, HourRow, KpiSummary, RevenueCostRow};

    fn sample_data() -> DashboardData {
        DashboardData {
            generated: "2024-01-01T00:00:00Z".to_string(),
            title: "Sales Dashboard".to_string(),
            kpis: KpiSummary {
                total_revenue: 50.0,
                total_profit: 20.0,
                profit_margin: 40.0,
                avg_order_value: 25.0,
            },
            top_selling_by_qty: vec![AggregateRow {
                key: "A".to_string(),
                value: 5.0,
            }],
            top_revenue_vs_cost: vec![RevenueCostRow {
                sku: "A".to_string(),
                total_revenue: 50.0,
                total_cost: 30.0,
            }],
            top_suppliers_by_profit: vec![AggregateRow {
                key: "S1".to_string(),
                value: 20.0,
            }],
            orders_by_hour: vec![HourRow { hour: 5, orders: 2 }],
            sales_by_category: vec![AggregateRow {
                key: "Beverages".to_string(),
                value: 5.0,
            }],
            top_products_by_revenue: vec![AggregateRow {
                key: "A".to_string(),
                value: 50.0,
            }],
        }
    }

    #[test]
    fn test_blob_is_injected_and_placeholder_removed() {
        let html = HtmlRenderer.render_page(&sample_data()).unwrap();

        assert!(!html.contains("__DASHBOARD_DATA__"));
        assert!(html.contains("\"total_revenue\":50.0"));
        assert!(html.contains("\"orders_by_hour\":[{\"hour\":5,\"orders\":2}]"));
    }

    #[test]
    fn test_page_has_three_kpi_cards_and_six_charts() {
        let html = HtmlRenderer.render_page(&sample_data()).unwrap();

        assert_eq!(html.matches("class=\"kpi-card\"").count(), 3);
        for id in [
            "chart-top-qty",
            "chart-revenue-cost",
            "chart-suppliers",
            "chart-hours",
            "chart-categories",
            "chart-top-revenue",
        ] {
            assert!(html.contains(&format!("id=\"{}\"", id)), "missing {}", id);
        }
    }

    #[test]
    fn test_write_page_creates_parent_directory() {
        let dir = std::env::temp_dir().join("sales_dashboard_render_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested/dashboard.html");

        let html = HtmlRenderer.render_page(&sample_data()).unwrap();
        HtmlRenderer
            .write_page(path.to_str().unwrap(), &html)
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, html);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
