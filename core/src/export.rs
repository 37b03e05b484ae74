//! CSV rendering of a product listing.
//!
//! Name and description are always quoted with embedded `"` doubled; the id,
//! numbers and category are written bare.

use crate::types::Product;

pub const CSV_FILE_NAME: &str = "productos.csv";
pub const CSV_HEADER: [&str; 6] = ["ID", "Name", "Description", "Price", "Stock", "Category"];

/// A rendered export, ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

impl CsvExport {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            file_name: CSV_FILE_NAME.to_string(),
            content: products_to_csv(products),
        }
    }
}

pub fn products_to_csv(products: &[Product]) -> String {
    let mut lines = Vec::with_capacity(products.len() + 1);
    lines.push(CSV_HEADER.join(","));
    lines.extend(products.iter().map(|p| {
        [
            p.id.clone(),
            quote(&p.name),
            quote(&p.description),
            p.price.to_string(),
            p.stock.to_string(),
            p.category.clone(),
        ]
        .join(",")
    }));
    lines.join("\n")
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
