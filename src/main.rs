use anyhow::{Context, Result};
use config::DashboardConfig;
use loader::load_orders_file;
use models::DashboardData;
use processor::{Aggregator, RecordCleaner};
use render::HtmlRenderer;
use std::env;
use std::path::Path;
use tracing::{info, warn};

mod config;
mod loader;
mod models;
mod processor;
mod render;

const DEFAULT_CONFIG_PATH: &str = "configs/dashboard.toml";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    info!("🚀 Starting Sales Dashboard Pipeline");

    let config = load_config()?;
    config.validate().context("Invalid dashboard configuration")?;
    info!(
        "Loaded configuration: {} -> {}",
        config.input_csv, config.output_html
    );

    // Stage 1: bulk load
    let raw_records =
        load_orders_file(&config.input_csv).context("Failed to load the order-line CSV")?;
    if raw_records.is_empty() {
        warn!("Input CSV has no data rows; the dashboard will be empty");
    }

    // Stage 2: cleaning and derivation
    let cleaner = RecordCleaner;
    let cleaned = cleaner.clean(raw_records);
    let kpis = cleaner.kpi_summary(&cleaned);
    info!(
        "KPIs: revenue {:.2}, profit {:.2}, margin {:.2}%, avg order value {:.2}",
        kpis.total_revenue, kpis.total_profit, kpis.profit_margin, kpis.avg_order_value
    );

    // Stage 3: the six chart queries, each an independent read over the
    // cleaned table
    let aggregator = Aggregator;
    let data = DashboardData {
        generated: chrono::Utc::now().to_rfc3339(),
        title: config.title.clone(),
        kpis,
        top_selling_by_qty: aggregator.top_selling_by_qty(&cleaned),
        top_revenue_vs_cost: aggregator.top_revenue_vs_cost(&cleaned),
        top_suppliers_by_profit: aggregator.top_suppliers_by_profit(&cleaned),
        orders_by_hour: aggregator.orders_by_hour(&cleaned),
        sales_by_category: aggregator.sales_by_category(&cleaned),
        top_products_by_revenue: aggregator.top_products_by_revenue(&cleaned),
    };
    info!(
        "Aggregated {} order lines into 6 chart tables",
        cleaned.len()
    );

    // Stage 4: render and write the page
    let renderer = HtmlRenderer;
    let html = renderer.render_page(&data)?;
    renderer.write_page(&config.output_html, &html)?;

    info!(
        "✅ Dashboard written to {} ({:.1} KB)",
        config.output_html,
        html.len() as f64 / 1024.0
    );

    Ok(())
}

/// Resolve configuration: `--config <path>` wins, then the default file if
/// present, then built-in defaults. Env overrides apply in all three cases.
fn load_config() -> Result<DashboardConfig> {
    let mut args = env::args().skip(1);
    let mut config_path: Option<String> = None;
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            config_path = args.next();
            if config_path.is_none() {
                anyhow::bail!("--config requires a file path argument");
            }
        }
    }

    if let Some(path) = config_path {
        return DashboardConfig::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path));
    }

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        return DashboardConfig::from_file(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_PATH));
    }

    warn!(
        "Config file not found at {}; using built-in defaults",
        DEFAULT_CONFIG_PATH
    );
    let mut config = DashboardConfig::default();
    config.apply_env_overrides();
    Ok(config)
}
