//! # Catalog Repository
//!
//! Keyed lookup and bulk upsert over the `products` table. No business
//! logic: the catalog is a lookup table the engine consumes, refreshed
//! wholesale by import.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use lane_core::Product;

/// Repository for product catalog operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Looks up a single product by barcode.
    pub async fn find_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT barcode, name, price, category FROM products WHERE barcode = ?1 LIMIT 1",
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Fetches many products at once, keyed by barcode. Barcodes without a
    /// catalog entry are simply absent from the result.
    pub async fn find_by_barcodes(&self, barcodes: &[String]) -> DbResult<HashMap<String, Product>> {
        if barcodes.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT barcode, name, price, category FROM products WHERE barcode IN (");
        let mut separated = builder.separated(", ");
        for barcode in barcodes {
            separated.push_bind(barcode);
        }
        builder.push(")");

        let products: Vec<Product> = builder.build_query_as().fetch_all(&self.pool).await?;

        Ok(products
            .into_iter()
            .map(|p| (p.barcode.clone(), p))
            .collect())
    }

    /// Upserts a batch of products, overwriting by barcode.
    ///
    /// Not atomic across the batch: this is a data refresh, and rows applied
    /// before a mid-batch storage failure stay applied.
    pub async fn bulk_replace(&self, products: &[Product]) -> DbResult<usize> {
        debug!(count = products.len(), "Bulk replacing catalog rows");

        for product in products {
            sqlx::query(
                "INSERT INTO products (barcode, name, price, category) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (barcode) DO UPDATE SET
                     name = excluded.name,
                     price = excluded.price,
                     category = excluded.category",
            )
            .bind(&product.barcode)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.category)
            .execute(&self.pool)
            .await?;
        }

        Ok(products.len())
    }

    /// All products ordered by name, for catalog listings.
    pub async fn all_products(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT barcode, name, price, category FROM products ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Number of catalog entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Removes every product. Test/reset path only.
    pub async fn clear_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM products").execute(&self.pool).await?;
        Ok(())
    }
}
