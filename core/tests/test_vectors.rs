//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Bodies are compared as parsed JSON so field
//! order does not matter.

use inventory_core::{
    ApiError, Availability, HttpMethod, HttpResponse, NewProduct, Pagination, Product,
    ProductClient, ProductFilters,
};

const BASE_URL: &str = "http://localhost:3000/api";

fn client() -> ProductClient {
    ProductClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value, key: &str) -> HttpResponse {
    let sim = &case[key];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn filters_from(value: &serde_json::Value) -> ProductFilters {
    ProductFilters {
        category: value["category"].as_str().map(str::to_string),
        price_min: value["price_min"].as_f64(),
        price_max: value["price_max"].as_f64(),
        availability: value["availability"].as_str().and_then(Availability::from_select),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let filters = filters_from(&case["filters"]);
        let page = case["page"].as_u64().unwrap() as u32;
        let page_size = case["page_size"].as_u64().unwrap() as u32;
        let expected_req = &case["expected_request"];

        let req = c.build_list_products(&filters, page, page_size).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        let parsed = c.parse_list_products(simulated(case, "simulated_response")).unwrap();
        assert_eq!(
            parsed.products.len() as u64,
            case["expected_count"].as_u64().unwrap(),
            "{name}: count"
        );
        let expected: Option<Pagination> =
            serde_json::from_value(case["expected_pagination"].clone()).unwrap();
        assert_eq!(parsed.pagination, expected, "{name}: pagination");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: NewProduct = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_create_product(&input).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        let result = c.parse_create_product(simulated(case, "simulated_response"));
        if let Some(expected_error) = case.get("expected_error") {
            match result.unwrap_err() {
                ApiError::Server { status, message } => {
                    assert_eq!(u64::from(status), expected_error["status"].as_u64().unwrap(), "{name}: status");
                    assert_eq!(message, expected_error["message"].as_str().unwrap(), "{name}: message");
                }
                other => panic!("{name}: unexpected error {other:?}"),
            }
        } else {
            let expected: Product = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Error normalization
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let err = c.parse_get_product(simulated(case, "response")).unwrap_err();
        assert_eq!(err.to_string(), case["expected_message"].as_str().unwrap(), "{name}: message");
        assert_eq!(
            err.is_user_correctable(),
            case["correctable"].as_bool().unwrap(),
            "{name}: correctable"
        );
    }
}
