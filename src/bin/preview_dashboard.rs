use anyhow::Result;

#[path = "../models/mod.rs"]
mod models;

#[path = "../loader/mod.rs"]
mod loader;

#[path = "../processor/mod.rs"]
mod processor;

#[path = "../render/mod.rs"]
mod render;

use loader::load_orders;
use models::DashboardData;
use processor::{Aggregator, RecordCleaner};
use render::HtmlRenderer;

// A small order-line sample with the warts the cleaner handles: a duplicated
// row, blank numerics, a missing sku and an unparseable timestamp.
const SAMPLE_CSV: &str = "\
order_id,sku,supplier_id,item_category,quantity_sold,selling_price_per_unit,purchasing_price_per_unit,order_created
1001,SKU-APPLE,SUP-1,Fruits,2,10.0,6.0,2024-01-01T05:00:00
1001,SKU-APPLE,SUP-1,Fruits,2,10.0,6.0,2024-01-01T05:00:00
1002,SKU-APPLE,SUP-1,Fruits,3,10.0,6.0,2024-01-01T05:30:00
1003,SKU-BREAD,SUP-2,Bakery,1,4.5,,2024-01-01 09:15:00
1004,SKU-MILK,SUP-2,Dairy,,3.0,2.0,never
1005,,SUP-3,Dairy,5,3.0,2.0,2024-01-01T11:00:00
1006,SKU-TEA,SUP-3,Beverages,4,7.5,5.0,2024-01-02T18:45:00
";

fn main() -> Result<()> {
    println!("=== SALES DASHBOARD PREVIEW ===\n");

    let raw = load_orders(SAMPLE_CSV.as_bytes())?;
    println!("Loaded {} raw rows", raw.len());

    let cleaner = RecordCleaner;
    let cleaned = cleaner.clean(raw);
    println!("{} rows after cleaning\n", cleaned.len());

    let kpis = cleaner.kpi_summary(&cleaned);
    println!("KPIs:");
    println!("  total revenue:   ${:.2}", kpis.total_revenue);
    println!("  total profit:    ${:.2}", kpis.total_profit);
    println!("  profit margin:   {:.2}%", kpis.profit_margin);
    println!("  avg order value: ${:.2}", kpis.avg_order_value);

    let aggregator = Aggregator;
    let data = DashboardData {
        generated: chrono::Utc::now().to_rfc3339(),
        title: "Sales Dashboard (preview)".to_string(),
        kpis,
        top_selling_by_qty: aggregator.top_selling_by_qty(&cleaned),
        top_revenue_vs_cost: aggregator.top_revenue_vs_cost(&cleaned),
        top_suppliers_by_profit: aggregator.top_suppliers_by_profit(&cleaned),
        orders_by_hour: aggregator.orders_by_hour(&cleaned),
        sales_by_category: aggregator.sales_by_category(&cleaned),
        top_products_by_revenue: aggregator.top_products_by_revenue(&cleaned),
    };

    println!("\nTop SKUs by quantity:");
    for row in &data.top_selling_by_qty {
        println!("  {:<12} {:>8.1}", row.key, row.value);
    }

    println!("\nOrders by hour:");
    for row in &data.orders_by_hour {
        println!("  {:02}:00 {:>4}", row.hour, row.orders);
    }

    println!("\nSales by category:");
    for row in &data.sales_by_category {
        println!("  {:<12} {:>8.1}", row.key, row.value);
    }

    let renderer = HtmlRenderer;
    let html = renderer.render_page(&data)?;
    renderer.write_page("out/preview_dashboard.html", &html)?;
    println!(
        "\n✅ out/preview_dashboard.html written ({:.1} KB)",
        html.len() as f64 / 1024.0
    );

    Ok(())
}
