use std::sync::Arc;

use inferd::api::{self, CorsPolicy};
use inferd::config::Config;
use inferd::http::request::{Method, Request, RequestBuilder};
use inferd::http::response::StatusCode;
use inferd::http::router::Router;
use inferd::inference::Engine;

fn test_config(allow_origin: Option<&str>) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        allow_origin: allow_origin.map(str::to_string),
        fail_on_missing_model: false,
        model_path: "does-not-exist.onnx".to_string(),
        read_timeout: None,
    }
}

fn test_routes(allow_origin: Option<&str>) -> Router {
    let cfg = test_config(allow_origin);
    let engine = Arc::new(Engine::load(&cfg).unwrap());
    api::routes(engine, CorsPolicy::from_config(&cfg))
}

fn post_predict(body: &[u8]) -> Request {
    RequestBuilder::new()
        .method(Method::POST)
        .path("/predict")
        .header("Content-Type", "application/json")
        .body(body.to_vec())
        .build()
        .unwrap()
}

#[test]
fn test_health_returns_ok() {
    let router = test_routes(Some("*"));
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/health")
        .build()
        .unwrap();

    let response = router.dispatch(&req);
    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"ok".to_vec());
}

#[test]
fn test_predict_valid_input() {
    let router = test_routes(Some("*"));
    let response = router.dispatch(&post_predict(br#"{"x": 2.0}"#));

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        response.headers.get("Content-Type").unwrap(),
        "application/json"
    );

    let reply: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(reply["y"].as_f64().unwrap(), 6.5);
    assert_eq!(reply["note"].as_str().unwrap(), "dummy");
}

#[test]
fn test_predict_integer_x_accepted() {
    let router = test_routes(Some("*"));
    let response = router.dispatch(&post_predict(br#"{"x": 1}"#));

    assert_eq!(response.status, StatusCode::Ok);
    let reply: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(reply["y"].as_f64().unwrap(), 3.5);
}

#[test]
fn test_predict_missing_x_is_rejected() {
    let router = test_routes(Some("*"));
    let response = router.dispatch(&post_predict(br#"{"z": 2.0}"#));

    assert_eq!(response.status, StatusCode::BadRequest);
    let reply: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(reply["error"].as_str().unwrap(), "x must be a number");
}

#[test]
fn test_predict_non_numeric_x_is_rejected() {
    let router = test_routes(Some("*"));
    let response = router.dispatch(&post_predict(br#"{"x": "two"}"#));

    assert_eq!(response.status, StatusCode::BadRequest);
}

#[test]
fn test_predict_unparsable_json_is_rejected() {
    let router = test_routes(Some("*"));
    let response = router.dispatch(&post_predict(b"{not json"));

    assert_eq!(response.status, StatusCode::BadRequest);
    let reply: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert!(reply["error"].as_str().is_some());
}

#[test]
fn test_predict_preflight_carries_cors_headers() {
    let router = test_routes(Some("https://example.com"));
    let req = RequestBuilder::new()
        .method(Method::OPTIONS)
        .path("/predict")
        .build()
        .unwrap();

    let response = router.dispatch(&req);
    assert_eq!(response.status, StatusCode::NoContent);
    assert_eq!(
        response.headers.get("Access-Control-Allow-Origin").unwrap(),
        "https://example.com"
    );
    assert_eq!(
        response.headers.get("Access-Control-Allow-Headers").unwrap(),
        "Content-Type"
    );
    assert_eq!(
        response.headers.get("Access-Control-Allow-Methods").unwrap(),
        "POST, OPTIONS"
    );
}

#[test]
fn test_predict_response_carries_cors_headers() {
    let router = test_routes(Some("*"));
    let response = router.dispatch(&post_predict(br#"{"x": 0}"#));

    assert_eq!(
        response.headers.get("Access-Control-Allow-Origin").unwrap(),
        "*"
    );
}

#[test]
fn test_no_origin_header_when_origin_unset() {
    let router = test_routes(None);
    let response = router.dispatch(&post_predict(br#"{"x": 0}"#));

    assert!(!response.headers.contains_key("Access-Control-Allow-Origin"));
    // The rest of the CORS policy is still announced.
    assert!(response.headers.contains_key("Access-Control-Allow-Methods"));
}

#[test]
fn test_unroutable_requests() {
    let router = test_routes(Some("*"));

    let missing = RequestBuilder::new()
        .method(Method::GET)
        .path("/nowhere")
        .build()
        .unwrap();
    assert_eq!(router.dispatch(&missing).status, StatusCode::NotFound);

    let wrong_method = RequestBuilder::new()
        .method(Method::DELETE)
        .path("/predict")
        .build()
        .unwrap();
    assert_eq!(
        router.dispatch(&wrong_method).status,
        StatusCode::MethodNotAllowed
    );
}
