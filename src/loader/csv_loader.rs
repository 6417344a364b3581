use anyhow::{Context, Result, bail};
use std::io::Read;
use tracing::info;

use crate::models::RawOrderRecord;

/// Columns that must exist in the input header. Their names are the wire
/// contract with whoever produces the CSV; a missing column is a
/// configuration error, not a data-quality issue, and aborts the run.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "order_id",
    "sku",
    "supplier_id",
    "item_category",
    "quantity_sold",
    "selling_price_per_unit",
    "purchasing_price_per_unit",
    "order_created",
];

/// Load raw order lines from any CSV reader.
///
/// The header is validated before any row is touched. Individual bad cells
/// (blank or non-numeric values) are tolerated and surface as `None` fields;
/// a structurally broken row (wrong field count, bad quoting) is fatal.
pub fn load_orders<R: Read>(reader: R) -> Result<Vec<RawOrderRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV header row")?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .copied()
        .collect();
    if !missing.is_empty() {
        bail!("Input CSV is missing required column(s): {}", missing.join(", "));
    }

    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize().enumerate() {
        // +2: one for the header row, one for 1-based line numbers
        let record: RawOrderRecord =
            result.with_context(|| format!("Malformed CSV row at line {}", index + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// Load raw order lines from a CSV file path.
pub fn load_orders_file(path: &str) -> Result<Vec<RawOrderRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open input CSV '{}'", path))?;
    let records = load_orders(file)?;
    info!("Loaded {} raw order lines from {}", records.len(), path);
    Ok(records)
}
