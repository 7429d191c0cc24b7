//! Request builders and response parsers for `oneshot` tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use serde::Serialize;
use serde_json::Value;

/// Build a JSON request with the given method
pub fn json_request(method: &str, uri: &str, body: &impl Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn json_post(uri: &str, body: &impl Serialize) -> Request<Body> {
    json_request("POST", uri, body)
}

pub fn json_put(uri: &str, body: &impl Serialize) -> Request<Body> {
    json_request("PUT", uri, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn empty_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Parse response body as generic JSON Value
pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Assert that a JSON error body carries the expected code
#[macro_export]
macro_rules! assert_error_code {
    ($body:expr, $code:expr) => {
        assert_eq!(
            $body["code"], $code,
            "unexpected error body: {}",
            $body
        );
    };
}
