//! Everything the console shows, as plain data.

use inventory_core::{
    Availability, CsvExport, FieldErrors, Pagination, Product, ProductFilters, ProductForm,
    ProductPage, TableView,
};

use crate::notify::Toasts;

/// Offered in the category selects when the backend cannot list them.
pub const FALLBACK_CATEGORIES: [&str; 10] = [
    "Electrónicos",
    "Ropa",
    "Hogar",
    "Deportes",
    "Libros",
    "Juguetes",
    "Alimentación",
    "Belleza",
    "Automóvil",
    "Otros",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based page currently requested.
    pub number: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl PageState {
    pub fn new(size: u32) -> Self {
        Self {
            number: 1,
            size,
            total_pages: 0,
            total_count: 0,
        }
    }
}

/// Raw text of the filter inputs. Converted to `ProductFilters` on apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    pub category: String,
    pub price_min: String,
    pub price_max: String,
    pub availability: String,
}

impl FilterInputs {
    /// Blank or non-numeric price text means "no bound".
    pub fn to_filters(&self) -> ProductFilters {
        let category = Some(self.category.trim())
            .filter(|category| !category.is_empty())
            .map(str::to_string);
        ProductFilters {
            category,
            price_min: parse_bound(&self.price_min),
            price_max: parse_bound(&self.price_max),
            availability: Availability::from_select(&self.availability),
        }
    }
}

fn parse_bound(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|bound| bound.is_finite())
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    /// Editing the product fetched when the modal opened (the edit target).
    Edit(Product),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProductModal {
    #[default]
    Closed,
    Open(FormMode),
}

impl ProductModal {
    pub fn is_open(&self) -> bool {
        matches!(self, ProductModal::Open(_))
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            ProductModal::Closed => None,
            ProductModal::Open(FormMode::Create) => Some("New product"),
            ProductModal::Open(FormMode::Edit(_)) => Some("Edit product"),
        }
    }
}

/// The product awaiting delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub page: PageState,
    pub filters: FilterInputs,
    pub products: Vec<Product>,
    pub pagination: Option<Pagination>,
    pub table: TableView,
    pub categories: Vec<String>,
    pub modal: ProductModal,
    pub form: ProductForm,
    pub field_errors: FieldErrors,
    /// `Some` while the delete dialog is visible.
    pub pending_delete: Option<PendingDelete>,
    pub saving: bool,
    pub deleting: bool,
    pub initialized: bool,
    pub toasts: Toasts,
    pub last_export: Option<CsvExport>,
    pub(crate) list_generation: u64,
    /// Bumped by every modal transition and every edit fetch.
    pub(crate) modal_generation: u64,
}

impl UiState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: PageState::new(page_size),
            filters: FilterInputs::default(),
            products: Vec::new(),
            pagination: None,
            table: TableView::default(),
            categories: Vec::new(),
            modal: ProductModal::Closed,
            form: ProductForm::default(),
            field_errors: FieldErrors::new(),
            pending_delete: None,
            saving: false,
            deleting: false,
            initialized: false,
            toasts: Toasts::default(),
            last_export: None,
            list_generation: 0,
            modal_generation: 0,
        }
    }

    pub fn edit_target(&self) -> Option<&Product> {
        match &self.modal {
            ProductModal::Open(FormMode::Edit(product)) => Some(product),
            _ => None,
        }
    }

    pub fn delete_dialog_visible(&self) -> bool {
        self.pending_delete.is_some()
    }

    pub(crate) fn open_modal(&mut self, mode: FormMode) {
        self.form = match &mode {
            FormMode::Create => ProductForm::default(),
            FormMode::Edit(product) => ProductForm::from_product(product),
        };
        self.field_errors.clear();
        self.modal = ProductModal::Open(mode);
        self.modal_generation += 1;
    }

    pub(crate) fn close_modal(&mut self) {
        self.modal = ProductModal::Closed;
        self.form = ProductForm::default();
        self.field_errors.clear();
        self.modal_generation += 1;
    }

    /// Replaces the listing and everything derived from it.
    pub(crate) fn show_page(&mut self, page: ProductPage) {
        if let Some(pagination) = page.pagination {
            self.page.total_pages = pagination.total_pages;
            self.page.total_count = pagination.total_products;
        } else {
            self.page.total_pages = 0;
            self.page.total_count = page.products.len() as u64;
        }
        self.table = TableView::build(&page.products, page.pagination.as_ref());
        self.products = page.products;
        self.pagination = page.pagination;
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.list_generation += 1;
        self.list_generation
    }

    pub(crate) fn next_modal_generation(&mut self) -> u64 {
        self.modal_generation += 1;
        self.modal_generation
    }
}
