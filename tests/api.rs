//! Router-level API tests

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use gitscan::{create_app, Config};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_app(Config::default()).unwrap().router
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_service_identity() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "gitscan");
}

#[tokio::test]
async fn rules_listing_exposes_categories_and_languages() {
    let response = app().oneshot(get("/api/v1/rules")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let categories = body["categories"].as_array().unwrap();
    assert!(categories.iter().any(|c| c["id"] == "sql_injection"));
    assert!(body["supported_languages"]
        .as_array()
        .unwrap()
        .iter()
        .any(|l| l == "python"));
}

#[tokio::test]
async fn scan_without_id_is_rejected() {
    let request = post_json(
        "/api/v1/scan",
        json!({
            "repository": {"clone_url": "https://example.com/repo.git"}
        }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("scan_id"));
}

#[tokio::test]
async fn scan_with_unknown_scan_type_is_rejected() {
    let request = post_json(
        "/api/v1/scan",
        json!({
            "scan_id": "scan-1",
            "repository": {"clone_url": "https://example.com/repo.git"},
            "options": {"scan_type": "TURBO"}
        }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_of_unknown_scan_is_not_found() {
    let response = app()
        .oneshot(get("/api/v1/scan/nope/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_of_unknown_scan_is_not_found() {
    let request = post_json("/api/v1/scan/nope/cancel", json!({}));
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn providers_listing_is_empty_without_keys() {
    let response = app().oneshot(get("/api/v1/llm/providers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn generate_fix_requires_vulnerability_fields() {
    let request = post_json(
        "/api/v1/llm/generate-fix",
        json!({
            "provider": "OPENAI",
            "vulnerability": {"title": "XSS"}
        }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("description"));
    assert!(message.contains("code_snippet"));
}

#[tokio::test]
async fn generate_fix_rejects_unknown_provider() {
    let request = post_json(
        "/api/v1/llm/generate-fix",
        json!({
            "provider": "MYSTERY",
            "vulnerability": {
                "title": "t", "description": "d", "category": "XSS",
                "file_path": "a.js", "code_snippet": "c", "language": "javascript"
            }
        }),
    );
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_requires_code() {
    let request = post_json("/api/v1/llm/analyze", json!({"provider": "OPENAI"}));
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Code is required");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = app()
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "GitScan API");
    assert!(body["paths"]["/api/v1/scan"].is_object());
}
