//! # Integration Tests for mapval-api
//!
//! Drives the router with `tower::ServiceExt::oneshot`: accepted JSON and
//! multipart bodies, malformed bodies, rejected documents, liveness.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mapval_api::state::ApiState;
use mapval_core::{FileConstraints, FileType};
use mapval_engine::Validator;
use mapval_rules::{Rule, RuleSet};

const BOUNDARY: &str = "mapval-test-boundary";
const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];

/// Helper: build the app around a small signup schema.
fn test_app() -> Router {
    let rules = RuleSet::builder()
        .rule("name", Rule::string().max(16))
        .rule("age", Rule::int().min(18))
        .rule(
            "avatar",
            Rule::file(FileConstraints::new().allow(FileType::Png)).nullable(),
        )
        .build();
    mapval_api::app(ApiState::new(Validator::new(rules)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/validate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: encode text parts and one optional file part.
fn multipart_request(texts: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/v1/validate/form")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// -- Health -------------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

// -- JSON ---------------------------------------------------------------------

#[tokio::test]
async fn test_json_document_accepted() {
    let (status, body) = send(test_app(), json_request(r#"{"name": "ana", "age": 30}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("ana"));
    assert_eq!(body["data"]["age"], json!(30));
    assert_eq!(body["filled"], json!(["age", "name"]));
    assert_eq!(body["null"], json!(["avatar"]));
}

#[tokio::test]
async fn test_json_empty_body_is_bad_request() {
    let (status, body) = send(test_app(), json_request("")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
    assert_eq!(body["error"]["message"], json!("no data"));
    assert!(body["error"].get("kind").is_none());
}

#[tokio::test]
async fn test_json_malformed_body_is_bad_request() {
    let (status, body) = send(test_app(), json_request(r#"{"name": "#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], json!("is not valid json"));
}

#[tokio::test]
async fn test_json_missing_field_is_unprocessable() {
    let (status, body) = send(test_app(), json_request(r#"{"name": "ana"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
    assert_eq!(body["error"]["kind"], json!("missing"));
    assert_eq!(body["error"]["message"], json!("we need 'age' field"));
}

#[tokio::test]
async fn test_json_bound_violation_kind() {
    let (status, body) = send(test_app(), json_request(r#"{"name": "ana", "age": 12}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], json!("bound"));
}

// -- Multipart ----------------------------------------------------------------

#[tokio::test]
async fn test_form_with_png_accepted() {
    let request = multipart_request(
        &[("name", "ana"), ("age", "21")],
        Some(("avatar", "me.png", PNG)),
    );
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["age"], json!(21));
    assert_eq!(body["data"]["avatar"]["file_name"], json!("me.png"));
    assert_eq!(body["data"]["avatar"]["size"], json!(PNG.len()));
}

#[tokio::test]
async fn test_form_rejects_non_png() {
    let request = multipart_request(
        &[("name", "ana"), ("age", "21")],
        Some(("avatar", "me.txt", b"plain text")),
    );
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], json!("file"));
}

#[tokio::test]
async fn test_form_unparsable_number_is_type_mismatch() {
    let request = multipart_request(&[("name", "ana"), ("age", "old")], None);
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], json!("type_mismatch"));
    assert_eq!(body["error"]["message"], json!("the field 'age' should be 'int'"));
}
