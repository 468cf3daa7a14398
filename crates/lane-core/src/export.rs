//! # Sales History Export
//!
//! Flattens sales and their line items into delimited text, one record per
//! line item.
//!
//! ## Enrichment vs History
//! Snapshot fields (name, unit price) come from the line item - they are
//! historical fact. The category column is enrichment: it is looked up from
//! the *current* catalog by the caller and passed in, so a recategorized
//! product shows its latest grouping even on old sales.
//!
//! Product names are free text; the writer applies standard quote escaping,
//! which is load-bearing for names containing commas or quotes.

use std::collections::HashMap;

use crate::error::CoreResult;
use crate::types::{Product, SaleWithLines};

/// Export column header, fixed order.
const HEADER: [&str; 13] = [
    "terminal_id",
    "sale_id",
    "sold_at",
    "payment_method",
    "total_amount",
    "tendered_amount",
    "change_amount",
    "cancelled",
    "barcode",
    "product_name",
    "category",
    "unit_price",
    "quantity",
];

/// Timestamp format used in exported rows.
const SOLD_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds the export text.
///
/// Row order is deterministic: sales in input order (newest first, as the
/// history feed delivers them), line items in the order established at
/// commit time (barcode ascending).
pub fn build_sales_csv(
    sales: &[SaleWithLines],
    catalog: &HashMap<String, Product>,
) -> CoreResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for entry in sales {
        let sale = &entry.sale;
        for line in &entry.lines {
            let category = catalog
                .get(&line.product_barcode)
                .and_then(|p| p.category.as_deref())
                .unwrap_or("");

            writer.write_record([
                sale.terminal_id.clone(),
                sale.id.to_string(),
                sale.created_at.format(SOLD_AT_FORMAT).to_string(),
                sale.payment_method.clone(),
                sale.total_amount.units().to_string(),
                sale.tendered_amount.units().to_string(),
                sale.change_amount.units().to_string(),
                sale.is_cancelled.to_string(),
                line.product_barcode.clone(),
                line.name_snapshot.clone(),
                category.to_string(),
                line.unit_price_snapshot.units().to_string(),
                line.quantity.to_string(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // The writer only ever received valid UTF-8.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
