//! Async API client: the core's build/parse pairs executed over a `Transport`.
//!
//! # Design
//! `request` is the only place that touches the transport. It turns the
//! loading indicator on for the duration of the call, bounds it with the
//! configured timeout, and maps transport failures into `ApiError`. Every
//! operation is `build_* -> request -> parse_*`, so a request that fails a
//! local pre-check never reaches the transport.

use std::time::Duration;

use inventory_core::stats::{self, FULL_LISTING_LIMIT};
use inventory_core::{
    ApiError, HttpRequest, HttpResponse, InventoryStats, NewProduct, Product, ProductClient,
    ProductFilters, ProductPage, ProductPatch,
};
use tracing::{debug, error, warn};

use crate::config::AppConfig;
use crate::loading::LoadingIndicator;
use crate::transport::{Transport, TransportError};

pub struct ApiClient<T> {
    client: ProductClient,
    transport: T,
    timeout: Duration,
    loading: LoadingIndicator,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(client: ProductClient, transport: T, timeout: Duration) -> Self {
        Self {
            client,
            transport,
            timeout,
            loading: LoadingIndicator::default(),
        }
    }

    pub fn from_config(config: &AppConfig, transport: T) -> Self {
        Self::new(ProductClient::new(&config.api_url), transport, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes one request under the loading indicator and the timeout.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let _busy = self.loading.begin();
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending request");

        match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(Ok(response)) => {
                debug!(%method, %url, status = response.status, "response received");
                Ok(response)
            }
            Ok(Err(TransportError::Timeout)) | Err(_) => {
                warn!(%method, %url, timeout_ms = self.timeout.as_millis() as u64, "request timed out");
                Err(ApiError::Timeout)
            }
            Ok(Err(TransportError::Connect(detail))) => {
                error!(%method, %url, %detail, "server unreachable");
                Err(ApiError::Unreachable)
            }
            Ok(Err(TransportError::Other(detail))) => {
                error!(%method, %url, %detail, "request failed");
                Err(ApiError::Transport(detail))
            }
        }
    }

    pub async fn list_products(
        &self,
        filters: &ProductFilters,
        page: u32,
        page_size: u32,
    ) -> Result<ProductPage, ApiError> {
        let request = self.client.build_list_products(filters, page, page_size)?;
        let response = self.request(request).await?;
        self.client.parse_list_products(response).inspect_err(log_failure)
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let request = self.client.build_get_product(id)?;
        let response = self.request(request).await?;
        self.client.parse_get_product(response).inspect_err(log_failure)
    }

    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let request = self.client.build_create_product(product)?;
        let response = self.request(request).await?;
        self.client.parse_create_product(response).inspect_err(log_failure)
    }

    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Product, ApiError> {
        let request = self.client.build_update_product(id, patch)?;
        let response = self.request(request).await?;
        self.client.parse_update_product(response).inspect_err(log_failure)
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete_product(id)?;
        let response = self.request(request).await?;
        self.client.parse_delete_product(response).inspect_err(log_failure)
    }

    pub async fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        let response = self.request(self.client.build_list_categories()).await?;
        self.client.parse_list_categories(response).inspect_err(log_failure)
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let request = self.client.build_list_by_category(category)?;
        let response = self.request(request).await?;
        self.client.parse_list_by_category(response).inspect_err(log_failure)
    }

    /// Every product up to the full-listing limit, unfiltered.
    pub async fn list_all(&self) -> Result<Vec<Product>, ApiError> {
        let page = self
            .list_products(&ProductFilters::default(), 1, FULL_LISTING_LIMIT)
            .await?;
        Ok(page.products)
    }

    /// True when a minimal listing call succeeds. Never fails.
    pub async fn check_connectivity(&self) -> bool {
        match self.list_products(&ProductFilters::default(), 1, 1).await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "connectivity check failed");
                false
            }
        }
    }

    /// Aggregates over the full listing; `None` when it cannot be fetched.
    pub async fn statistics(&self) -> Option<InventoryStats> {
        match self.list_all().await {
            Ok(products) => Some(stats::compute(&products)),
            Err(err) => {
                error!(error = %err, "could not compute statistics");
                None
            }
        }
    }
}

fn log_failure(err: &ApiError) {
    match err.status() {
        Some(status) => warn!(status, error = %err, "server reported a failure"),
        None => warn!(error = %err, "response could not be used"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use inventory_core::HttpMethod;

    use super::*;

    /// Answers every request with the same canned result and records it.
    struct Canned {
        result: Result<HttpResponse, TransportError>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(result: Result<HttpResponse, TransportError>) -> Self {
            Self {
                result,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.result.clone()
        }
    }

    struct Stalled;

    #[async_trait]
    impl Transport for Stalled {
        async fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            std::future::pending().await
        }
    }

    fn api<T: Transport>(transport: T) -> ApiClient<T> {
        ApiClient::new(
            ProductClient::new("http://localhost:3000/api"),
            transport,
            Duration::from_secs(10),
        )
    }

    const LISTING: &str = r#"{"success":true,"data":[
        {"_id":"a","nombre":"Lamp","descripcion":"Desk lamp, warm light","precio":20,"stock":2,"categoria":"Hogar"},
        {"_id":"b","nombre":"Shirt","descripcion":"Plain cotton shirt","precio":10,"stock":0,"categoria":"Ropa"}
    ],"pagination":{"paginaActual":1,"totalPaginas":1,"totalProductos":2}}"#;

    #[tokio::test]
    async fn missing_id_never_reaches_the_transport() {
        let api = api(Canned::new(Ok(HttpResponse::new(200, "{}"))));
        let err = api.delete_product("  ").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingId));
        assert!(api.transport().seen().is_empty());
    }

    #[tokio::test]
    async fn connect_failure_becomes_unreachable() {
        let api = api(Canned::new(Err(TransportError::Connect("refused".to_string()))));
        let err = api.list_categories().await.unwrap_err();
        assert!(matches!(err, ApiError::Unreachable));
        assert!(!api.loading().is_loading());
    }

    #[tokio::test]
    async fn other_transport_failures_keep_their_message() {
        let api = api(Canned::new(Err(TransportError::Other("tls handshake failed".to_string()))));
        let err = api.list_categories().await.unwrap_err();
        assert_eq!(err.to_string(), "tls handshake failed");
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_request_times_out_and_clears_loading() {
        let api = api(Stalled);
        let err = api.get_product("a").await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(err.to_string(), "the request took too long");
        assert!(!api.loading().is_loading());
    }

    #[tokio::test]
    async fn connectivity_is_a_bool() {
        let up = api(Canned::new(Ok(HttpResponse::new(200, LISTING))));
        assert!(up.check_connectivity().await);
        let seen = up.transport().seen();
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].query(), Some("page=1&limit=1"));

        let down = api(Canned::new(Ok(HttpResponse::new(500, r#"{"message":"boom"}"#))));
        assert!(!down.check_connectivity().await);
    }

    #[tokio::test]
    async fn statistics_use_the_full_listing() {
        let api = api(Canned::new(Ok(HttpResponse::new(200, LISTING))));
        let stats = api.statistics().await.unwrap();
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.inventory_value, 40.0);
        assert_eq!(api.transport().seen()[0].query(), Some("page=1&limit=1000"));
    }

    #[tokio::test]
    async fn statistics_are_none_on_failure() {
        let api = api(Canned::new(Err(TransportError::Connect("refused".to_string()))));
        assert!(api.statistics().await.is_none());
    }
}
