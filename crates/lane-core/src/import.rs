//! # Catalog Import Parsing
//!
//! Turns catalog CSV text into products, skipping rows that do not parse.
//!
//! ## Record Shape
//! Four quoted, comma-separated fields after a header row:
//!
//! ```csv
//! barcode,name,price,category
//! "4901234567894","Oolong Tea 500ml","150","drink"
//! "4909876543210","Onigiri, Salmon","180",""
//! ```
//!
//! Price is a whole-unit integer; category may be empty. A row that fails to
//! parse - too few fields, non-integer or negative price, empty barcode - is
//! skipped and reported per-row, never fatal to the batch. The data refresh
//! must land whatever it can.

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::types::Product;

/// Outcome of parsing one import file.
#[derive(Debug, Default)]
pub struct ParsedImport {
    /// Rows that parsed cleanly, in file order.
    pub products: Vec<Product>,

    /// One [`CoreError::MalformedImportRow`] per skipped row.
    pub skipped: Vec<CoreError>,
}

/// Parses catalog CSV text. The first line is a header and is skipped.
///
/// Never fails as a whole: malformed rows land in [`ParsedImport::skipped`]
/// with their line number and reason.
pub fn parse_products_csv(input: &str) -> ParsedImport {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let mut parsed = ParsedImport::default();

    for (index, record) in reader.records().enumerate() {
        // Header is line 1, the first record line 2.
        let line = index as u64 + 2;

        let record = match record {
            Ok(record) => record,
            Err(err) => {
                parsed.skipped.push(CoreError::MalformedImportRow {
                    line,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        match parse_record(&record) {
            Ok(product) => parsed.products.push(product),
            Err(err) => parsed.skipped.push(CoreError::MalformedImportRow {
                line,
                reason: err.to_string(),
            }),
        }
    }

    parsed
}

fn parse_record(record: &csv::StringRecord) -> Result<Product, ValidationError> {
    if record.len() < 3 {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    let barcode = field(record, 0);
    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    let name = field(record, 1);
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    let raw_price = field(record, 2);
    let price: i64 = raw_price
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "price".to_string(),
            value: raw_price.clone(),
        })?;
    if price < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    // Fourth field is optional; empty means uncategorized.
    let category = match record.get(3).map(str::trim) {
        Some("") | None => None,
        Some(value) => Some(value.to_string()),
    };

    Ok(Product {
        barcode,
        name,
        price: Money::from_units(price),
        category,
    })
}

fn field(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}
