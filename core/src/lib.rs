//! Sans-IO client core for the inventory (productos) API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network. Alongside the client live the pieces of the product
//! console that are pure functions of data: validation rules, the edit form,
//! the table and pager view-models, CSV export and inventory statistics.
//!
//! # Design
//! - `ProductClient` holds only a base URL and default headers.
//! - Each operation is split into `build_*` and `parse_*`; local pre-checks
//!   fail in `build_*` so nothing reaches the wire.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod export;
pub mod form;
pub mod http;
pub mod stats;
pub mod types;
pub mod validation;
pub mod view;

pub use client::ProductClient;
pub use error::ApiError;
pub use export::CsvExport;
pub use form::{FieldErrors, ProductForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    Availability, Envelope, InventoryStats, NewProduct, Pagination, Product, ProductField,
    ProductFilters, ProductPage, ProductPatch,
};
pub use view::{PageItem, PaginationView, StockStatus, TableView};
