//! Renderable view-models for the product table and its pager.
//!
//! Pure functions of (products, pagination); a front end only has to lay the
//! structures out.

use crate::types::{Pagination, Product};

/// Pages shown on each side of the current page.
pub const PAGE_WINDOW: u32 = 2;

/// Stock at or below this (and above zero) is shown as low.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub target: u32,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, current: bool },
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current: u32,
    pub total_pages: u32,
    pub previous: PageButton,
    pub next: PageButton,
    pub items: Vec<PageItem>,
}

impl PaginationView {
    /// `None` when everything fits on one page.
    pub fn build(current: u32, total_pages: u32) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }
        let current = current.clamp(1, total_pages);
        let start = current.saturating_sub(PAGE_WINDOW).max(1);
        let end = current.saturating_add(PAGE_WINDOW).min(total_pages);

        let page = |number| PageItem::Page {
            number,
            current: number == current,
        };

        let mut items = Vec::new();
        if start > 1 {
            items.push(page(1));
            if start > 2 {
                items.push(PageItem::Ellipsis);
            }
        }
        items.extend((start..=end).map(page));
        if end < total_pages {
            if end < total_pages - 1 {
                items.push(PageItem::Ellipsis);
            }
            items.push(page(total_pages));
        }

        Some(Self {
            current,
            total_pages,
            previous: PageButton {
                target: current.saturating_sub(1),
                disabled: current == 1,
            },
            next: PageButton {
                target: current.saturating_add(1),
                disabled: current == total_pages,
            },
            items,
        })
    }

    /// Page numbers in display order, ellipses skipped.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.items
            .iter()
            .filter_map(|item| match item {
                PageItem::Page { number, .. } => Some(*number),
                PageItem::Ellipsis => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    OutOfStock,
    Low,
    Available,
}

impl StockStatus {
    pub fn for_stock(stock: i64) -> Self {
        match stock {
            s if s <= 0 => StockStatus::OutOfStock,
            s if s <= LOW_STOCK_THRESHOLD => StockStatus::Low,
            _ => StockStatus::Available,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::Low => "Low stock",
            StockStatus::Available => "Available",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
    pub category: String,
    pub status: StockStatus,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_price(product.price),
            stock: product.stock,
            category: product.category.clone(),
            status: StockStatus::for_stock(product.stock),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub rows: Vec<ProductRow>,
    /// "Showing X of Y products", when pagination info is known.
    pub summary: Option<String>,
    pub pagination: Option<PaginationView>,
}

impl TableView {
    pub fn build(products: &[Product], pagination: Option<&Pagination>) -> Self {
        if products.is_empty() {
            return Self::default();
        }
        let rows: Vec<ProductRow> = products.iter().map(ProductRow::from).collect();
        let summary = pagination.map(|p| {
            format!("Showing {} of {} products", rows.len(), p.total_products)
        });
        let pagination = pagination.and_then(|p| PaginationView::build(p.current_page, p.total_pages));
        Self {
            rows,
            summary,
            pagination,
        }
    }

    /// True when the empty-state placeholder should be shown.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_in_the_middle_has_two_ellipses() {
        let view = PaginationView::build(5, 10).unwrap();
        assert_eq!(
            view.items,
            vec![
                PageItem::Page { number: 1, current: false },
                PageItem::Ellipsis,
                PageItem::Page { number: 3, current: false },
                PageItem::Page { number: 4, current: false },
                PageItem::Page { number: 5, current: true },
                PageItem::Page { number: 6, current: false },
                PageItem::Page { number: 7, current: false },
                PageItem::Ellipsis,
                PageItem::Page { number: 10, current: false },
            ]
        );
        assert!(!view.previous.disabled);
        assert!(!view.next.disabled);
    }

    #[test]
    fn first_page_has_no_leading_ellipsis() {
        let view = PaginationView::build(1, 10).unwrap();
        assert_eq!(view.items.first(), Some(&PageItem::Page { number: 1, current: true }));
        assert_ne!(view.items.get(1), Some(&PageItem::Ellipsis));
        assert_eq!(view.page_numbers(), vec![1, 2, 3, 10]);
        assert!(view.previous.disabled);
        assert!(!view.next.disabled);
    }

    #[test]
    fn last_page_disables_next() {
        let view = PaginationView::build(10, 10).unwrap();
        assert_eq!(view.page_numbers(), vec![1, 8, 9, 10]);
        assert!(view.next.disabled);
    }

    #[test]
    fn window_touching_an_edge_skips_ellipsis() {
        let view = PaginationView::build(4, 7).unwrap();
        assert_eq!(view.page_numbers(), vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(!view.items.contains(&PageItem::Ellipsis));
    }

    #[test]
    fn huge_page_counts_do_not_overflow() {
        let view = PaginationView::build(u32::MAX, u32::MAX).unwrap();
        assert_eq!(view.current, u32::MAX);
        assert!(view.next.disabled);
        assert_eq!(view.next.target, u32::MAX);
        assert_eq!(view.page_numbers(), vec![1, u32::MAX - 2, u32::MAX - 1, u32::MAX]);
    }

    #[test]
    fn single_page_has_no_pager() {
        assert!(PaginationView::build(1, 1).is_none());
        assert!(PaginationView::build(1, 0).is_none());
    }

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(StockStatus::for_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_stock(5), StockStatus::Low);
        assert_eq!(StockStatus::for_stock(6), StockStatus::Available);
    }

    #[test]
    fn table_summary_and_rows() {
        let products = vec![Product {
            id: "a".to_string(),
            name: "Mug".to_string(),
            description: "Ceramic coffee mug".to_string(),
            price: 7.5,
            stock: 3,
            category: "Hogar".to_string(),
        }];
        let pagination = Pagination {
            current_page: 2,
            total_pages: 3,
            total_products: 21,
        };
        let table = TableView::build(&products, Some(&pagination));
        assert_eq!(table.rows[0].price, "7.50");
        assert_eq!(table.rows[0].status, StockStatus::Low);
        assert_eq!(table.summary.as_deref(), Some("Showing 1 of 21 products"));
        assert_eq!(table.pagination.unwrap().current, 2);
    }

    #[test]
    fn empty_table_has_no_summary_or_pager() {
        let table = TableView::build(&[], None);
        assert!(table.is_empty());
        assert!(table.summary.is_none());
        assert!(table.pagination.is_none());
    }
}
