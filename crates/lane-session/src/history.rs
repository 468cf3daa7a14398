//! # History Service
//!
//! Read-side reconciliation: joins the ledger's sales and line items with
//! the *current* catalog to produce the flattened export, and serves the
//! per-sale detail view behind the history screen.

use std::collections::BTreeSet;

use tracing::info;

use crate::error::SessionResult;
use lane_core::{export, LineItem};
use lane_db::{CatalogRepository, Database, SaleRepository};

/// Export and detail reads over committed sales.
#[derive(Debug, Clone)]
pub struct HistoryService {
    sales: SaleRepository,
    catalog: CatalogRepository,
}

impl HistoryService {
    pub fn new(db: &Database) -> Self {
        HistoryService {
            sales: db.sales(),
            catalog: db.catalog(),
        }
    }

    /// Builds the full history export.
    ///
    /// Snapshot fields come from the line items; the category column is
    /// enrichment looked up live from the catalog, so recategorized
    /// products show their latest grouping even on old sales.
    pub async fn export_csv(&self) -> SessionResult<String> {
        let joined = self.sales.sales_with_lines().await?;

        // Every barcode referenced anywhere in history, deduplicated.
        let barcodes: Vec<String> = joined
            .iter()
            .flat_map(|entry| entry.lines.iter())
            .map(|line| line.product_barcode.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let catalog = self.catalog.find_by_barcodes(&barcodes).await?;

        let csv = export::build_sales_csv(&joined, &catalog)?;
        info!(
            sales = joined.len(),
            referenced_products = barcodes.len(),
            "Built history export"
        );
        Ok(csv)
    }

    /// Line items for one sale, in commit order - the detail view under a
    /// tapped history row.
    pub async fn sale_lines(&self, sale_id: i64) -> SessionResult<Vec<LineItem>> {
        Ok(self.sales.lines_for_sale(sale_id).await?)
    }
}
