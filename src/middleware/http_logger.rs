use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use std::time::Instant;

use crate::config::{APP_CONFIG, CERTIFICATE_PUBLIC_PREFIX};

const SENSITIVE_FIELDS: [&str; 6] = [
    "password",
    "token",
    "authorization",
    "secret",
    "api_key",
    "credentials",
];

const SENSITIVE_HEADERS: [header::HeaderName; 2] = [header::AUTHORIZATION, header::COOKIE];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/")
        || path.starts_with(CERTIFICATE_PUBLIC_PREFIX)
        || path.starts_with("/swagger-ui")
        || path.starts_with("/api-docs")
}

/// Replaces sensitive values at any depth of a JSON document.
fn filter_sensitive_data(mut value: Value) -> Value {
    redact(&mut value);
    value
}

fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                let key = key.to_ascii_lowercase();
                if SENSITIVE_FIELDS.iter().any(|s| key.contains(s)) {
                    *field = Value::String("[REDACTED]".to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

fn filter_sensitive_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered_headers = headers.clone();
    for name in SENSITIVE_HEADERS {
        if filtered_headers.contains_key(&name) {
            filtered_headers.insert(name, HeaderValue::from_static("[REDACTED]"));
        }
    }
    filtered_headers
}

fn parse_json_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(json) => filter_sensitive_data(json),
        Err(_) => Value::Object(serde_json::Map::new()),
    }
}

pub async fn http_logger(
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    if should_ignore_path(&path) || method == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (parts, body) = req.into_parts();
    let bytes = buffer_body("request", body).await?;
    let req_body = parse_json_body(&bytes);
    let req = Request::from_parts(parts, Body::from(bytes));

    let mut response = next.run(req).await;

    let latency = start_time.elapsed();
    let status = response.status();

    let should_log_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
    let res_body = if should_log_body {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let json_body = parse_json_body(&bytes);
        response = Response::from_parts(parts, Body::from(bytes));
        json_body
    } else {
        Value::Object(serde_json::Map::new())
    };

    let filtered_req_headers = filter_sensitive_headers(&req_headers);

    tracing::info!(
        method = ?method,
        path = %path,
        x_request_id = %x_request_id,
        req_headers = ?filtered_req_headers,
        req_body = %req_body,
        status = ?status,
        latency_ms = latency.as_millis(),
        res_body = %res_body,
        app_env = %APP_CONFIG.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

pub async fn buffer_body<B>(
    direction: &str,
    body: B,
) -> std::result::Result<Bytes, (StatusCode, String)>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    match body.collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => Err((
            StatusCode::BAD_REQUEST,
            format!("failed to read {direction} body: {err}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redacts_nested_secrets() {
        let body = json!({
            "email": "ana@example.com",
            "password": "hunter2",
            "session": { "token": "abc", "kind": "bearer" },
            "items": [{ "api_key": "k", "title": "Rust 101" }]
        });

        let filtered = filter_sensitive_data(body);

        assert_eq!(filtered["email"], "ana@example.com");
        assert_eq!(filtered["password"], "[REDACTED]");
        assert_eq!(filtered["session"]["token"], "[REDACTED]");
        assert_eq!(filtered["session"]["kind"], "bearer");
        assert_eq!(filtered["items"][0]["api_key"], "[REDACTED]");
        assert_eq!(filtered["items"][0]["title"], "Rust 101");
    }

    #[test]
    fn test_non_json_body_logs_as_empty_object() {
        assert_eq!(parse_json_body(b"not json"), json!({}));
    }

    #[test]
    fn test_ignores_static_and_health_paths() {
        assert!(should_ignore_path("/health"));
        assert!(should_ignore_path("/certificates/LMS-2026-01-01-0000000000001.png"));
        assert!(!should_ignore_path("/api/trainings"));
    }

    #[test]
    fn test_authorization_header_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let filtered = filter_sensitive_headers(&headers);

        assert_eq!(filtered[header::AUTHORIZATION], "[REDACTED]");
        assert_eq!(filtered[header::CONTENT_TYPE], "application/json");
    }
}
