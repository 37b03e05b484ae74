use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Envelope, Product};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn seeded(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| Product {
            id: format!("p{i}"),
            nombre: format!("Product {i}"),
            descripcion: "Seeded product for paging".to_string(),
            precio: 10.0 + i as f64,
            stock: (i % 3) as i64,
            categoria: if i % 2 == 0 { "Hogar" } else { "Ropa" }.to_string(),
        })
        .collect()
}

const VALID_BODY: &str = r#"{"nombre":"Buy milk","descripcion":"Two litres of whole milk","precio":2.5,"stock":10,"categoria":"Alimentación"}"#;

// --- list ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app().oneshot(get("/api/productos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Envelope<Vec<Product>> = body_json(resp).await;
    assert!(envelope.success);
    assert!(envelope.data.unwrap().is_empty());
    let pagination = envelope.pagination.unwrap();
    assert_eq!(pagination.pagina_actual, 1);
    assert_eq!(pagination.total_productos, 0);
}

#[tokio::test]
async fn list_products_paginates() {
    let resp = app_with(seeded(25))
        .oneshot(get("/api/productos?page=3&limit=10"))
        .await
        .unwrap();

    let envelope: Envelope<Vec<Product>> = body_json(resp).await;
    let data = envelope.data.unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0].id, "p20");
    let pagination = envelope.pagination.unwrap();
    assert_eq!(pagination.total_paginas, 3);
    assert_eq!(pagination.total_productos, 25);
}

#[tokio::test]
async fn list_products_filters() {
    let resp = app_with(seeded(12))
        .oneshot(get("/api/productos?categoria=Hogar&precioMin=12&disponible=false"))
        .await
        .unwrap();

    let envelope: Envelope<Vec<Product>> = body_json(resp).await;
    let ids: Vec<String> = envelope.data.unwrap().into_iter().map(|p| p.id).collect();
    // Hogar = even indices, stock 0 = multiples of 3, price >= 12 = index >= 2.
    assert_eq!(ids, vec!["p6".to_string()]);
}

#[tokio::test]
async fn list_categories_returns_vocabulary() {
    let resp = app().oneshot(get("/api/categorias")).await.unwrap();
    let envelope: Envelope<Vec<String>> = body_json(resp).await;
    let categories = envelope.data.unwrap();
    assert_eq!(categories.len(), 10);
    assert!(categories.contains(&"Electrónicos".to_string()));
}

#[tokio::test]
async fn list_by_category_path() {
    let resp = app_with(seeded(4))
        .oneshot(get("/api/productos/categoria/Ropa"))
        .await
        .unwrap();
    let envelope: Envelope<Vec<Product>> = body_json(resp).await;
    assert_eq!(envelope.data.unwrap().len(), 2);
}

// --- create ---

#[tokio::test]
async fn create_product_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/productos", VALID_BODY))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: Envelope<Product> = body_json(resp).await;
    let product = envelope.data.unwrap();
    assert_eq!(product.nombre, "Buy milk");
    assert!(!product.id.is_empty());
}

#[tokio::test]
async fn create_product_missing_fields_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/productos", r#"{"nombre":"Only name"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: Envelope<()> = body_json(resp).await;
    assert!(!envelope.success);
    assert!(envelope.message.unwrap().starts_with("Validation error"));
}

#[tokio::test]
async fn create_product_duplicate_name_returns_409() {
    let mut seed = seeded(1);
    seed[0].nombre = "buy MILK".to_string();
    let resp = app_with(seed)
        .oneshot(json_request("POST", "/api/productos", VALID_BODY))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let envelope: Envelope<()> = body_json(resp).await;
    assert_eq!(
        envelope.message.as_deref(),
        Some("A product with that name already exists")
    );
}

#[tokio::test]
async fn create_product_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/productos", r#"{"precio":"cheap"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete ---

#[tokio::test]
async fn get_product_not_found() {
    let resp = app().oneshot(get("/api/productos/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let envelope: Envelope<()> = body_json(resp).await;
    assert_eq!(envelope.message.as_deref(), Some("Product not found"));
}

#[tokio::test]
async fn update_product_rejects_invalid_price() {
    let resp = app_with(seeded(1))
        .oneshot(json_request("PUT", "/api/productos/p0", r#"{"precio":0}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_product_not_found() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/productos/missing")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/productos", VALID_BODY))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Envelope<Product> = body_json(resp).await;
    let created = created.data.unwrap();
    let id = created.id.clone();

    // list contains it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/productos"))
        .await
        .unwrap();
    let listed: Envelope<Vec<Product>> = body_json(resp).await;
    assert_eq!(listed.data.unwrap(), vec![created.clone()]);

    // partial update: stock only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/api/productos/{id}"), r#"{"stock":0}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Envelope<Product> = body_json(resp).await;
    let updated = updated.data.unwrap();
    assert_eq!(updated.stock, 0);
    assert_eq!(updated.nombre, "Buy milk"); // unchanged

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/productos/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    let deleted: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(deleted["success"], true);

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/productos/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
