use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const CATEGORIES: [&str; 10] = [
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

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 1000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub stock: i64,
    pub categoria: String,
}

/// Body of both POST and PUT. POST requires every field.
#[derive(Debug, Default, Deserialize)]
pub struct ProductInput {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub stock: Option<i64>,
    pub categoria: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub categoria: Option<String>,
    pub precio_min: Option<f64>,
    pub precio_max: Option<f64>,
    pub disponible: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub pagina_actual: u32,
    pub total_paginas: u32,
    pub total_productos: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
        }
    }
}

/// An error answered as `{ success: false, message }`.
#[derive(Debug)]
pub struct Failure(StatusCode, String);

impl Failure {
    fn validation(problems: Vec<&str>) -> Self {
        Failure(
            StatusCode::BAD_REQUEST,
            format!("Validation error: {}", problems.join(", ")),
        )
    }

    fn not_found() -> Self {
        Failure(StatusCode::NOT_FOUND, "Product not found".to_string())
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            success: false,
            data: None,
            pagination: None,
            message: Some(self.1),
        };
        (self.0, Json(body)).into_response()
    }
}

pub type Db = Arc<RwLock<Vec<Product>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router whose store starts with `products`.
pub fn app_with(products: Vec<Product>) -> Router {
    let db: Db = Arc::new(RwLock::new(products));
    let api = Router::new()
        .route("/productos", get(list_products).post(create_product))
        .route(
            "/productos/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/productos/categoria/{categoria}", get(list_by_category))
        .route("/categorias", get(list_categories));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock inventory API listening");
    }
    axum::serve(listener, app()).await
}

async fn list_products(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Envelope<Vec<Product>>> {
    let products = db.read().await;
    let matching: Vec<&Product> = products.iter().filter(|p| params.matches(p)).collect();

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let page = params.page.unwrap_or(1).max(1);
    let total = matching.len() as u64;
    let skip = (page - 1).saturating_mul(limit) as usize;

    let data = matching
        .into_iter()
        .skip(skip)
        .take(limit as usize)
        .cloned()
        .collect();
    Json(Envelope {
        success: true,
        data: Some(data),
        pagination: Some(Pagination {
            pagina_actual: page,
            total_paginas: total.div_ceil(u64::from(limit)) as u32,
            total_productos: total,
        }),
        message: None,
    })
}

impl ListParams {
    fn matches(&self, product: &Product) -> bool {
        if let Some(categoria) = self.categoria.as_deref().filter(|c| !c.is_empty()) {
            if product.categoria != categoria {
                return false;
            }
        }
        if self.precio_min.is_some_and(|min| product.precio < min) {
            return false;
        }
        if self.precio_max.is_some_and(|max| product.precio > max) {
            return false;
        }
        match self.disponible.as_deref() {
            Some("true") => product.stock > 0,
            Some("false") => product.stock == 0,
            _ => true,
        }
    }
}

async fn list_by_category(
    State(db): State<Db>,
    Path(categoria): Path<String>,
) -> Json<Envelope<Vec<Product>>> {
    let products = db.read().await;
    let data = products
        .iter()
        .filter(|p| p.categoria == categoria)
        .cloned()
        .collect();
    Json(Envelope::ok(data))
}

async fn list_categories() -> Json<Envelope<Vec<String>>> {
    Json(Envelope::ok(CATEGORIES.iter().map(|c| c.to_string()).collect()))
}

async fn get_product(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Product>>, Failure> {
    let products = db.read().await;
    products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(|p| Json(Envelope::ok(p)))
        .ok_or_else(Failure::not_found)
}

async fn create_product(
    State(db): State<Db>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Envelope<Product>>), Failure> {
    let mut missing = Vec::new();
    if input.nombre.is_none() {
        missing.push("nombre is required");
    }
    if input.descripcion.is_none() {
        missing.push("descripcion is required");
    }
    if input.precio.is_none() {
        missing.push("precio is required");
    }
    if input.stock.is_none() {
        missing.push("stock is required");
    }
    if input.categoria.is_none() {
        missing.push("categoria is required");
    }
    if !missing.is_empty() {
        return Err(Failure::validation(missing));
    }
    input.check()?;

    let mut products = db.write().await;
    let nombre = input.nombre.unwrap_or_default();
    ensure_unique(&products, &nombre, None)?;
    let product = Product {
        id: Uuid::new_v4().simple().to_string(),
        nombre: nombre.trim().to_string(),
        descripcion: input.descripcion.unwrap_or_default().trim().to_string(),
        precio: input.precio.unwrap_or_default(),
        stock: input.stock.unwrap_or_default(),
        categoria: input.categoria.unwrap_or_default(),
    };
    products.push(product.clone());
    Ok((StatusCode::CREATED, Json(Envelope::ok(product))))
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Envelope<Product>>, Failure> {
    input.check()?;
    let mut products = db.write().await;
    if let Some(nombre) = &input.nombre {
        ensure_unique(&products, nombre, Some(&id))?;
    }
    let product = products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(Failure::not_found)?;
    if let Some(nombre) = input.nombre {
        product.nombre = nombre.trim().to_string();
    }
    if let Some(descripcion) = input.descripcion {
        product.descripcion = descripcion.trim().to_string();
    }
    if let Some(precio) = input.precio {
        product.precio = precio;
    }
    if let Some(stock) = input.stock {
        product.stock = stock;
    }
    if let Some(categoria) = input.categoria {
        product.categoria = categoria;
    }
    Ok(Json(Envelope::ok(product.clone())))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, Failure> {
    let mut products = db.write().await;
    let index = products
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(Failure::not_found)?;
    products.remove(index);
    Ok(Json(Envelope {
        success: true,
        data: None,
        pagination: None,
        message: Some("Product deleted".to_string()),
    }))
}

impl ProductInput {
    /// Checks the fields that are present.
    fn check(&self) -> Result<(), Failure> {
        let mut problems = Vec::new();
        if let Some(nombre) = &self.nombre {
            if !(2..=100).contains(&nombre.trim().chars().count()) {
                problems.push("nombre must be 2-100 characters");
            }
        }
        if let Some(descripcion) = &self.descripcion {
            if !(10..=500).contains(&descripcion.trim().chars().count()) {
                problems.push("descripcion must be 10-500 characters");
            }
        }
        if self.precio.is_some_and(|precio| precio <= 0.0) {
            problems.push("precio must be greater than 0");
        }
        if self.stock.is_some_and(|stock| stock < 0) {
            problems.push("stock must be 0 or more");
        }
        if let Some(categoria) = &self.categoria {
            if !CATEGORIES.contains(&categoria.as_str()) {
                problems.push("categoria is not a known category");
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Failure::validation(problems))
        }
    }
}

fn ensure_unique(products: &[Product], nombre: &str, except: Option<&str>) -> Result<(), Failure> {
    let nombre = nombre.trim().to_lowercase();
    let taken = products
        .iter()
        .any(|p| Some(p.id.as_str()) != except && p.nombre.to_lowercase() == nombre);
    if taken {
        return Err(Failure(
            StatusCode::CONFLICT,
            "A product with that name already exists".to_string(),
        ));
    }
    Ok(())
}
