//! Inventory aggregates over a product listing.

use std::collections::HashSet;

use crate::types::{InventoryStats, Product};

/// Upper bound on the listing used for statistics, search and export.
pub const FULL_LISTING_LIMIT: u32 = 1000;

pub fn compute(products: &[Product]) -> InventoryStats {
    let total_products = products.len();
    let available = products.iter().filter(|p| p.stock > 0).count();
    let out_of_stock = products.iter().filter(|p| p.stock == 0).count();
    let inventory_value = products.iter().map(|p| p.price * p.stock as f64).sum();
    let category_count = products
        .iter()
        .map(|p| p.category.as_str())
        .collect::<HashSet<_>>()
        .len();
    let average_price = if total_products == 0 {
        0.0
    } else {
        products.iter().map(|p| p.price).sum::<f64>() / total_products as f64
    };

    InventoryStats {
        total_products,
        available,
        out_of_stock,
        inventory_value,
        category_count,
        average_price,
    }
}

impl InventoryStats {
    /// One-line summary suitable for a notification.
    pub fn summary(&self) -> String {
        format!(
            "Total products: {} | Available: {} | Out of stock: {} | Inventory value: ${:.2}",
            self.total_products, self.available, self.out_of_stock, self.inventory_value
        )
    }
}
