//! Domain DTOs for the inventory API.
//!
//! # Design
//! Field names are English in Rust and Spanish on the wire (`nombre`,
//! `precio`, ...), matching the backend's JSON. The mock-server crate defines
//! its own copies of these shapes; the integration tests catch drift.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{
    validate_description, validate_name, validate_new_product_price, validate_patch_price,
};

/// A product as returned by the API. `id` is assigned by the server and
/// treated as opaque.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "categoria")]
    pub category: String,
}

impl Product {
    /// Case-insensitive substring match on name or description.
    pub fn matches_text(&self, text: &str) -> bool {
        let needle = text.trim().to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// Payload for creating a product. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[validate(schema(function = "validate_new_product_price", skip_on_field_errors = false))]
pub struct NewProduct {
    #[serde(rename = "nombre")]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[serde(rename = "descripcion")]
    #[validate(custom(function = "validate_description"))]
    pub description: String,
    #[serde(rename = "precio")]
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: f64,
    #[validate(range(min = 0, message = "stock must be 0 or more"))]
    pub stock: i64,
    #[serde(rename = "categoria")]
    #[validate(length(min = 1, message = "a category is required"))]
    pub category: String,
}

/// Payload for updating a product. Only the fields present are sent, and
/// only those are validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[validate(schema(function = "validate_patch_price", skip_on_field_errors = false))]
pub struct ProductPatch {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_description"))]
    pub description: Option<String>,
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "stock must be 0 or more"))]
    pub stock: Option<i64>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "a category is required"))]
    pub category: Option<String>,
}

impl From<NewProduct> for ProductPatch {
    fn from(product: NewProduct) -> Self {
        Self {
            name: Some(product.name),
            description: Some(product.description),
            price: Some(product.price),
            stock: Some(product.stock),
            category: Some(product.category),
        }
    }
}

/// The five editable product fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    Name,
    Description,
    Price,
    Stock,
    Category,
}

impl ProductField {
    pub const ALL: [ProductField; 5] = [
        ProductField::Name,
        ProductField::Description,
        ProductField::Price,
        ProductField::Stock,
        ProductField::Category,
    ];

    /// JSON key used by the backend.
    pub fn wire_name(self) -> &'static str {
        match self {
            ProductField::Name => "nombre",
            ProductField::Description => "descripcion",
            ProductField::Price => "precio",
            ProductField::Stock => "stock",
            ProductField::Category => "categoria",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProductField::Name => "name",
            ProductField::Description => "description",
            ProductField::Price => "price",
            ProductField::Stock => "stock",
            ProductField::Category => "category",
        };
        f.write_str(label)
    }
}

/// Stock availability filter. Sent as `disponible=true|false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "true")]
    InStock,
    #[serde(rename = "false")]
    OutOfStock,
}

impl Availability {
    /// Parses the value of the availability select. Empty or unknown values
    /// mean "any".
    pub fn from_select(value: &str) -> Option<Self> {
        match value.trim() {
            "true" => Some(Availability::InStock),
            "false" => Some(Availability::OutOfStock),
            _ => None,
        }
    }
}

/// Filters for the product listing. `None` fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub availability: Option<Availability>,
}

impl ProductFilters {
    pub fn is_empty(&self) -> bool {
        self.category().is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.availability.is_none()
    }

    /// The category filter, treating a blank string as absent.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
    }
}

/// Pagination block of the list envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(rename = "paginaActual")]
    pub current_page: u32,
    #[serde(rename = "totalPaginas")]
    pub total_pages: u32,
    #[serde(rename = "totalProductos")]
    pub total_products: u64,
}

/// The `{ success, data, ... }` wrapper every response uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Option<Pagination>,
}

/// Aggregates computed over a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryStats {
    pub total_products: usize,
    pub available: usize,
    pub out_of_stock: usize,
    pub inventory_value: f64,
    pub category_count: usize,
    pub average_price: f64,
}
