//! Async host for the inventory console.
//!
//! # Overview
//! Executes the requests built by `inventory_core` over a `Transport`, and
//! drives the console's state through `ViewController`: listing with filters
//! and pages, the create/edit modal, the delete dialog, toasts, CSV export,
//! statistics and a background connectivity monitor.
//!
//! # Design
//! - `transport` is the only module that performs network I/O.
//! - `api::ApiClient::request` is the single request primitive; it owns the
//!   timeout, the loading indicator and error normalization.
//! - `controller` holds no rendering code. A host renders `UiState`
//!   snapshots and feeds `UiAction`s back through `dispatch`.

pub mod actions;
pub mod api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod loading;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod state;
pub mod transport;

pub use actions::UiAction;
pub use api::ApiClient;
pub use config::AppConfig;
pub use controller::ViewController;
pub use loading::LoadingIndicator;
pub use monitor::spawn_connectivity_monitor;
pub use notify::{Toast, ToastLevel};
pub use state::{FormMode, PendingDelete, ProductModal, UiState};
pub use transport::{Transport, TransportError, UreqTransport};
