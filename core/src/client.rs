//! Stateless HTTP request builder and response parser for the inventory API.
//!
//! # Design
//! `ProductClient` holds only the base URL and the default headers. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. Pre-checks (empty
//! ids, invalid payloads) fail inside `build_*`, so a rejected call never
//! yields a request to execute.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use validator::Validate;

use crate::error::{ApiError, GENERIC_SERVER_ERROR};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Availability, Envelope, NewProduct, Product, ProductFilters, ProductPage, ProductPatch,
};
use crate::validation::failed_fields;

const JSON: &str = "application/json";

/// Query string of the listing endpoint. Field order is fixed so identical
/// arguments always produce identical URLs.
#[derive(Serialize)]
struct ListQuery<'a> {
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(rename = "precioMin", skip_serializing_if = "Option::is_none")]
    price_min: Option<f64>,
    #[serde(rename = "precioMax", skip_serializing_if = "Option::is_none")]
    price_max: Option<f64>,
    #[serde(rename = "disponible", skip_serializing_if = "Option::is_none")]
    availability: Option<Availability>,
    page: u32,
    limit: u32,
}

#[derive(Debug, Clone)]
pub struct ProductClient {
    base_url: String,
    default_headers: Vec<(String, String)>,
}

impl ProductClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: vec![("accept".to_string(), JSON.to_string())],
        }
    }

    /// Adds a header sent with every request, after the built-in defaults.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a request against `path` (which must start with `/`), merging
    /// the default headers with `extra_headers` and serializing `body` to JSON.
    pub fn build_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        extra_headers: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = self.default_headers.clone();
        let body = match body {
            Some(body) => {
                headers.push(("content-type".to_string(), JSON.to_string()));
                Some(serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?)
            }
            None => None,
        };
        headers.extend(
            extra_headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    fn build_bodyless(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: self.default_headers.clone(),
            body: None,
        }
    }

    pub fn build_list_products(
        &self,
        filters: &ProductFilters,
        page: u32,
        page_size: u32,
    ) -> Result<HttpRequest, ApiError> {
        let query = ListQuery {
            category: filters.category(),
            price_min: filters.price_min,
            price_max: filters.price_max,
            availability: filters.availability,
            page,
            limit: page_size,
        };
        let query =
            serde_urlencoded::to_string(&query).map_err(|e| ApiError::Serialization(e.to_string()))?;
        debug!(%query, "listing products");
        Ok(self.build_bodyless(HttpMethod::Get, &format!("/productos?{query}")))
    }

    pub fn build_get_product(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let id = encode_segment(require_id(id)?);
        Ok(self.build_bodyless(HttpMethod::Get, &format!("/productos/{id}")))
    }

    pub fn build_create_product(&self, product: &NewProduct) -> Result<HttpRequest, ApiError> {
        check(product)?;
        self.build_request(HttpMethod::Post, "/productos", Some(product), &[])
    }

    pub fn build_update_product(
        &self,
        id: &str,
        patch: &ProductPatch,
    ) -> Result<HttpRequest, ApiError> {
        let id = encode_segment(require_id(id)?);
        check(patch)?;
        self.build_request(HttpMethod::Put, &format!("/productos/{id}"), Some(patch), &[])
    }

    pub fn build_delete_product(&self, id: &str) -> Result<HttpRequest, ApiError> {
        let id = encode_segment(require_id(id)?);
        Ok(self.build_bodyless(HttpMethod::Delete, &format!("/productos/{id}")))
    }

    pub fn build_list_categories(&self) -> HttpRequest {
        self.build_bodyless(HttpMethod::Get, "/categorias")
    }

    pub fn build_list_by_category(&self, category: &str) -> Result<HttpRequest, ApiError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ApiError::MissingCategory);
        }
        let segment = encode_segment(category);
        Ok(self.build_bodyless(HttpMethod::Get, &format!("/productos/categoria/{segment}")))
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<ProductPage, ApiError> {
        let envelope: Envelope<Vec<Product>> = open_envelope(&response)?;
        Ok(ProductPage {
            products: envelope.data.unwrap_or_default(),
            pagination: envelope.pagination,
        })
    }

    pub fn parse_get_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        require_data(open_envelope(&response)?, "product not found")
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        require_data(open_envelope(&response)?, "error saving the product")
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        require_data(open_envelope(&response)?, "error saving the product")
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        // Some backends answer a delete with 204 and no body.
        if response.status == 204 {
            return Ok(());
        }
        open_envelope::<serde_json::Value>(&response).map(|_| ())
    }

    pub fn parse_list_categories(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        let envelope: Envelope<Vec<String>> = open_envelope(&response)?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub fn parse_list_by_category(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        let envelope: Envelope<Vec<Product>> = open_envelope(&response)?;
        Ok(envelope.data.unwrap_or_default())
    }
}

fn require_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::MissingId);
    }
    Ok(id)
}

fn check<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(|errors| {
        warn!(fields = ?failed_fields(&errors), "product rejected before sending");
        ApiError::InvalidProduct(errors)
    })
}

/// Map a response to its envelope: non-2xx statuses and `success: false`
/// become errors carrying the server's message when it sent one.
fn open_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Server {
            status: response.status,
            message: error_message(&response.body),
        });
    }
    let envelope: Envelope<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if !envelope.success {
        let message = envelope
            .message
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ApiError::Rejected(message));
    }
    Ok(envelope)
}

fn require_data<T>(envelope: Envelope<T>, fallback: &str) -> Result<T, ApiError> {
    envelope
        .data
        .ok_or_else(|| ApiError::Rejected(envelope.message.unwrap_or_else(|| fallback.to_string())))
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string())
}

/// Percent-encodes one path segment.
fn encode_segment(segment: &str) -> String {
    // `form_urlencoded` writes spaces as `+`, which is only valid in queries.
    serde_urlencoded::to_string([("", segment)])
        .map(|pair| pair.trim_start_matches('=').replace('+', "%20"))
        .unwrap_or_else(|_| segment.to_string())
}
