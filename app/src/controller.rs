//! The inventory console's behavior, independent of any rendering toolkit.
//!
//! # Design
//! `ViewController` owns the `UiState` behind an `Arc<Mutex<_>>` and an
//! `ApiClient` behind an `Arc`, so clones can be handed to the debounce timer
//! and the connectivity monitor. The lock is only taken in short synchronous
//! sections and never held across an `.await`.
//!
//! Every list fetch takes a new generation number before it starts; a
//! response is applied only if its generation is still the latest, so a slow
//! answer to an old filter never overwrites a newer one.
//!
//! All errors stop here: each operation reports failures as toasts and
//! leaves the state interactive.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use inventory_core::{
    ApiError, CsvExport, InventoryStats, Pagination, ProductField, ProductPage, ProductPatch,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::notify::{ToastLevel, CONNECTION_ERROR_DURATION, DEFAULT_DURATION, STATS_DURATION};
use crate::state::{FilterInputs, FormMode, PendingDelete, UiState, FALLBACK_CATEGORIES};
use crate::transport::Transport;

pub struct ViewController<T> {
    api: Arc<ApiClient<T>>,
    state: Arc<Mutex<UiState>>,
    debouncer: Debouncer,
}

impl<T> Clone for ViewController<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            debouncer: self.debouncer.clone(),
        }
    }
}

impl<T: Transport> ViewController<T> {
    pub fn new(api: ApiClient<T>, config: &AppConfig) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(Mutex::new(UiState::new(config.page_size))),
            debouncer: Debouncer::new(config.debounce),
        }
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn is_loading(&self) -> bool {
        self.api.loading().is_loading()
    }

    /// A copy of the current state, for rendering.
    pub fn snapshot(&self) -> UiState {
        self.lock().clone()
    }

    pub fn with_state<R>(&self, read: impl FnOnce(&UiState) -> R) -> R {
        read(&self.lock())
    }

    /// Toasts past their duration are dropped whenever the state is touched.
    fn lock(&self) -> MutexGuard<'_, UiState> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.toasts.expire(Instant::now());
        state
    }

    fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        self.lock().toasts.push(level, message, DEFAULT_DURATION);
    }

    // --- lifecycle ---

    /// Checks the backend, then loads categories and the first page. Returns
    /// false (and stays uninitialized) when the backend is unreachable.
    pub async fn initialize(&self) -> bool {
        info!(base_url = %self.api.base_url(), "initializing inventory console");
        if !self.api.check_connectivity().await {
            let message = format!(
                "Cannot connect to the server. Check that the API is running at {}",
                self.api.base_url()
            );
            self.lock()
                .toasts
                .push(ToastLevel::Error, message, CONNECTION_ERROR_DURATION);
            return false;
        }

        self.load_categories().await;
        self.load_products(1).await;
        self.lock().initialized = true;
        info!("inventory console ready");
        true
    }

    pub async fn load_categories(&self) {
        let categories = match self.api.list_categories().await {
            Ok(categories) => categories,
            Err(err) => {
                self.toast(ToastLevel::Error, format!("Error loading categories: {err}"));
                FALLBACK_CATEGORIES.iter().map(|c| c.to_string()).collect()
            }
        };
        self.lock().categories = categories;
    }

    /// Fetches `page` with the current filter inputs. A failed fetch empties
    /// the table; a superseded fetch changes nothing.
    pub async fn load_products(&self, page: u32) {
        let (filters, page_size, generation) = {
            let mut state = self.lock();
            state.page.number = page;
            (state.filters.to_filters(), state.page.size, state.next_generation())
        };

        let result = self.api.list_products(&filters, page, page_size).await;

        let mut state = self.lock();
        if state.list_generation != generation {
            debug!(generation, latest = state.list_generation, "discarding stale product page");
            return;
        }
        match result {
            Ok(listing) => state.show_page(listing),
            Err(err) => {
                state.toasts.error(format!("Error loading products: {err}"));
                state.show_page(ProductPage {
                    products: Vec::new(),
                    pagination: None,
                });
            }
        }
    }

    pub async fn reload(&self) {
        let page = self.lock().page.number;
        self.load_products(page).await;
        self.toast(ToastLevel::Info, "Data refreshed");
    }

    // --- paging & filters ---

    /// Ignored for page 0 and while any request is outstanding.
    pub async fn change_page(&self, page: u32) {
        if page < 1 || self.is_loading() {
            debug!(page, loading = self.is_loading(), "page change ignored");
            return;
        }
        self.load_products(page).await;
    }

    pub async fn apply_filters(&self) {
        self.load_products(1).await;
    }

    /// Replaces every filter input without fetching.
    pub fn set_filter_inputs(&self, inputs: FilterInputs) {
        self.debouncer.cancel();
        self.lock().filters = inputs;
    }

    pub async fn clear_filters(&self) {
        self.debouncer.cancel();
        self.lock().filters = FilterInputs::default();
        self.load_products(1).await;
    }

    pub async fn set_category_filter(&self, category: impl Into<String>) {
        self.lock().filters.category = category.into();
        self.apply_filters().await;
    }

    pub async fn set_availability_filter(&self, availability: impl Into<String>) {
        self.lock().filters.availability = availability.into();
        self.apply_filters().await;
    }

    /// Stores the text and applies it once typing pauses.
    pub fn set_price_min_input(&self, text: impl Into<String>) {
        self.lock().filters.price_min = text.into();
        self.schedule_filter_apply();
    }

    pub fn set_price_max_input(&self, text: impl Into<String>) {
        self.lock().filters.price_max = text.into();
        self.schedule_filter_apply();
    }

    fn schedule_filter_apply(&self) {
        let controller = self.clone();
        self.debouncer.schedule(async move {
            controller.apply_filters().await;
        });
    }

    /// Lists every product whose name or description contains `text` and
    /// shows them as a single page. Blank text reloads page 1.
    pub async fn search(&self, text: &str) {
        if text.trim().is_empty() {
            self.load_products(1).await;
            return;
        }
        let generation = {
            let mut state = self.lock();
            state.page.number = 1;
            state.next_generation()
        };

        let result = self.api.list_all().await;

        let mut state = self.lock();
        if state.list_generation != generation {
            return;
        }
        match result {
            Ok(products) => {
                let matches: Vec<_> = products.into_iter().filter(|p| p.matches_text(text)).collect();
                debug!(text, hits = matches.len(), "search finished");
                let pagination = Pagination {
                    current_page: 1,
                    total_pages: 1,
                    total_products: matches.len() as u64,
                };
                state.show_page(ProductPage {
                    products: matches,
                    pagination: Some(pagination),
                });
            }
            Err(err) => {
                state.toasts.error(format!("Search failed: {err}"));
            }
        }
    }

    // --- product modal ---

    pub fn new_product(&self) {
        self.lock().open_modal(FormMode::Create);
    }

    /// Fetches the product and opens the modal prefilled. On failure the
    /// modal stays closed. A result is dropped if another edit started or
    /// the modal opened or closed while it was in flight.
    pub async fn edit_product(&self, id: &str) {
        let generation = self.lock().next_modal_generation();
        let result = self.api.get_product(id).await;

        let mut state = self.lock();
        if state.modal_generation != generation {
            debug!(id, "discarding stale product for edit");
            return;
        }
        match result {
            Ok(product) => state.open_modal(FormMode::Edit(product)),
            Err(err) => {
                state.toasts.error(format!("Error loading product: {err}"));
            }
        }
    }

    pub fn close_product_modal(&self) {
        self.lock().close_modal();
    }

    /// Updates one input; a shown error for it is cleared, not re-checked.
    pub fn field_input(&self, field: ProductField, value: impl Into<String>) {
        let mut state = self.lock();
        state.form.set(field, value);
        state.field_errors.remove(&field);
    }

    /// Validates one input and shows or clears its error. Returns validity.
    pub fn field_blur(&self, field: ProductField) -> bool {
        let mut state = self.lock();
        match state.form.validate_field(field) {
            Ok(()) => {
                state.field_errors.remove(&field);
                true
            }
            Err(message) => {
                state.field_errors.insert(field, message);
                false
            }
        }
    }

    /// Validates the whole form, then creates or updates. The modal stays
    /// open on any failure.
    pub async fn submit_form(&self) {
        let (product, target) = {
            let mut state = self.lock();
            if !state.modal.is_open() || state.saving {
                return;
            }
            match state.form.to_new_product() {
                Ok(product) => {
                    state.field_errors.clear();
                    state.saving = true;
                    (product, state.edit_target().map(|p| p.id.clone()))
                }
                Err(errors) => {
                    state.field_errors = errors;
                    state.toasts.warning("Please fix the errors in the form");
                    return;
                }
            }
        };

        let result = match &target {
            Some(id) => self.api.update_product(id, &ProductPatch::from(product)).await,
            None => self.api.create_product(&product).await,
        };

        let page = {
            let mut state = self.lock();
            state.saving = false;
            match &result {
                Ok(_) => {
                    state.close_modal();
                    Some(state.page.number)
                }
                Err(err) => {
                    report_save_failure(&mut state, err);
                    None
                }
            }
        };

        if let Some(page) = page {
            self.load_products(page).await;
            let message = if target.is_some() {
                "Product updated successfully"
            } else {
                "Product created successfully"
            };
            self.toast(ToastLevel::Success, message);
        }
    }

    // --- delete dialog ---

    pub fn request_delete(&self, id: impl Into<String>, name: impl Into<String>) {
        self.lock().pending_delete = Some(PendingDelete {
            id: id.into(),
            name: name.into(),
        });
    }

    pub fn cancel_delete(&self) {
        self.lock().pending_delete = None;
    }

    /// Deletes the pending product and re-fetches the current page. On
    /// failure the dialog stays up so the user can retry.
    pub async fn confirm_delete(&self) {
        let pending = {
            let mut state = self.lock();
            if state.deleting {
                return;
            }
            let Some(pending) = state.pending_delete.clone() else {
                debug!("delete confirmed with nothing pending");
                return;
            };
            state.deleting = true;
            pending
        };

        let result = self.api.delete_product(&pending.id).await;

        let page = {
            let mut state = self.lock();
            state.deleting = false;
            match result {
                Ok(()) => {
                    state.pending_delete = None;
                    Some(state.page.number)
                }
                Err(err) => {
                    state.toasts.error(format!("Error deleting product: {err}"));
                    None
                }
            }
        };

        if let Some(page) = page {
            self.load_products(page).await;
            self.toast(
                ToastLevel::Success,
                format!("Product \"{}\" deleted successfully", pending.name),
            );
        }
    }

    /// Escape key: closes whichever overlay is showing.
    pub fn escape(&self) {
        let mut state = self.lock();
        if state.modal.is_open() {
            state.close_modal();
        }
        state.pending_delete = None;
    }

    // --- extras ---

    /// Renders every product as CSV and publishes it on the state.
    pub async fn export_csv(&self) -> Option<CsvExport> {
        match self.api.list_all().await {
            Ok(products) => {
                let export = CsvExport::from_products(&products);
                let mut state = self.lock();
                state.last_export = Some(export.clone());
                state.toasts.success("Products exported successfully");
                Some(export)
            }
            Err(err) => {
                self.toast(ToastLevel::Error, format!("Error exporting products: {err}"));
                None
            }
        }
    }

    pub async fn show_statistics(&self) -> Option<InventoryStats> {
        let stats = self.api.statistics().await?;
        self.lock()
            .toasts
            .push(ToastLevel::Info, stats.summary(), STATS_DURATION);
        Some(stats)
    }

    pub fn dismiss_toast(&self, id: u64) -> bool {
        self.lock().toasts.dismiss(id)
    }

    /// One connectivity poll. Only warns; nothing is retried or halted.
    pub async fn check_connection(&self) {
        if !self.lock().initialized {
            return;
        }
        if !self.api.check_connectivity().await {
            warn!("lost connection to the inventory API");
            self.toast(ToastLevel::Warning, "Connection to the server lost");
        }
    }
}

fn report_save_failure(state: &mut UiState, err: &ApiError) {
    if err.is_user_correctable() {
        state.toasts.warning(err.to_string());
    } else {
        state.toasts.error(format!("Error saving product: {err}"));
    }
}
