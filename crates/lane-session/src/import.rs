//! # Catalog Import
//!
//! Feeds a parsed CSV catalog into the gateway. Parsing is lane-core's job;
//! this service adds the storage write and the per-row skip logging.

use tracing::{info, warn};

use crate::error::SessionResult;
use lane_core::import;
use lane_db::{CatalogRepository, Database};

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows upserted into the catalog.
    pub imported: usize,

    /// Rows skipped because they did not parse.
    pub skipped: usize,
}

/// Imports catalog CSV text into the product table.
#[derive(Debug, Clone)]
pub struct CatalogImporter {
    catalog: CatalogRepository,
}

impl CatalogImporter {
    pub fn new(db: &Database) -> Self {
        CatalogImporter {
            catalog: db.catalog(),
        }
    }

    /// Parses and upserts the given CSV text.
    ///
    /// Malformed rows are skipped and logged, never fatal; a storage
    /// failure mid-batch surfaces as an error with the earlier rows already
    /// applied (this is a data refresh, not a transaction).
    pub async fn import_csv(&self, input: &str) -> SessionResult<ImportSummary> {
        let parsed = import::parse_products_csv(input);

        for skipped in &parsed.skipped {
            warn!(%skipped, "Skipping catalog import row");
        }

        let imported = self.catalog.bulk_replace(&parsed.products).await?;

        let summary = ImportSummary {
            imported,
            skipped: parsed.skipped.len(),
        };
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Catalog import complete"
        );
        Ok(summary)
    }
}
