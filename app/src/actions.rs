//! User intents as data, dispatched onto the controller.

use inventory_core::ProductField;

use crate::controller::ViewController;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    NewProduct,
    EditProduct { id: String },
    CloseModal,
    SubmitForm,
    FieldInput { field: ProductField, value: String },
    FieldBlur { field: ProductField },
    RequestDelete { id: String, name: String },
    ConfirmDelete,
    CancelDelete,
    /// Escape key or a click on an overlay backdrop.
    Escape,
    CategoryFilter(String),
    AvailabilityFilter(String),
    PriceMinInput(String),
    PriceMaxInput(String),
    ClearFilters,
    ChangePage(u32),
    Reload,
    Search(String),
    ExportCsv,
    ShowStatistics,
    DismissToast(u64),
}

impl<T: Transport> ViewController<T> {
    pub async fn dispatch(&self, action: UiAction) {
        tracing::debug!(?action, "dispatch");
        match action {
            UiAction::NewProduct => self.new_product(),
            UiAction::EditProduct { id } => self.edit_product(&id).await,
            UiAction::CloseModal => self.close_product_modal(),
            UiAction::SubmitForm => self.submit_form().await,
            UiAction::FieldInput { field, value } => self.field_input(field, value),
            UiAction::FieldBlur { field } => {
                self.field_blur(field);
            }
            UiAction::RequestDelete { id, name } => self.request_delete(id, name),
            UiAction::ConfirmDelete => self.confirm_delete().await,
            UiAction::CancelDelete => self.cancel_delete(),
            UiAction::Escape => self.escape(),
            UiAction::CategoryFilter(category) => self.set_category_filter(category).await,
            UiAction::AvailabilityFilter(value) => self.set_availability_filter(value).await,
            UiAction::PriceMinInput(text) => self.set_price_min_input(text),
            UiAction::PriceMaxInput(text) => self.set_price_max_input(text),
            UiAction::ClearFilters => self.clear_filters().await,
            UiAction::ChangePage(page) => self.change_page(page).await,
            UiAction::Reload => self.reload().await,
            UiAction::Search(text) => self.search(&text).await,
            UiAction::ExportCsv => {
                self.export_csv().await;
            }
            UiAction::ShowStatistics => {
                self.show_statistics().await;
            }
            UiAction::DismissToast(id) => {
                self.dismiss_toast(id);
            }
        }
    }
}
