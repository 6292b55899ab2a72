//! CSV dataset loading.
//!
//! Reads the product export into [`CatalogItem`]s. Numeric cells are cleaned
//! of currency symbols and thousands separators; cells that still do not
//! parse become zero with a warning. Rows without an id are skipped and a
//! repeated id keeps its first row.

use crate::{Error, Result};
use ahash::AHashSet;
use csv::StringRecord;
use prodsim_core::CatalogItem;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub const REQUIRED_COLUMNS: [&str; 7] = [
    "product_id",
    "product_name",
    "about_product",
    "category",
    "discounted_price",
    "rating",
    "rating_count",
];

/// Column positions resolved from the header row
struct Columns {
    id: usize,
    name: usize,
    about: usize,
    category: usize,
    price: usize,
    rating: usize,
    rating_count: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };
        Ok(Self {
            id: find("product_id")?,
            name: find("product_name")?,
            about: find("about_product")?,
            category: find("category")?,
            price: find("discounted_price")?,
            rating: find("rating")?,
            rating_count: find("rating_count")?,
        })
    }
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogItem>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::Dataset {
        path: path.to_path_buf(),
        message: format!("Failed to open dataset: {e}"),
    })?;
    let items = read_catalog(file)?;
    info!(path = %path.display(), items = items.len(), "Dataset loaded");
    Ok(items)
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::resolve(reader.headers()?)?;

    let mut items = Vec::new();
    let mut seen = AHashSet::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or("").trim();

        let id = cell(columns.id);
        if id.is_empty() {
            warn!(row = line + 1, "Skipping row without product_id");
            continue;
        }
        if !seen.insert(id.to_string()) {
            warn!(product_id = id, "Duplicate product_id, keeping the first row");
            continue;
        }

        items.push(CatalogItem::new(
            id,
            cell(columns.name),
            cell(columns.category),
            cell(columns.about),
            numeric(id, "discounted_price", cell(columns.price)),
            numeric(id, "rating", cell(columns.rating)) as f32,
            numeric(id, "rating_count", cell(columns.rating_count)).max(0.0) as u64,
        ));
    }
    Ok(items)
}

/// Parse a cell like `₹1,099` or `24,269`.
fn numeric(id: &str, column: &str, raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            if !raw.is_empty() {
                warn!(product_id = id, column, value = raw, "Unparseable numeric cell, using 0");
            }
            0.0
        }
    }
}
