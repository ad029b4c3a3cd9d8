use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header, response::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

const REQUEST_ID: &str = "X-Request-Id";

/// Request fields, most specific first so `policy_version` wins over `locale`.
const KNOWN_FIELDS: &[&str] = &[
    "policy_version",
    "session_id",
    "question",
    "airlines",
    "airline",
    "locale",
    "limit",
];

async fn take_body(res: Response) -> (Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    KNOWN_FIELDS
        .iter()
        .find(|key| msg.contains(*key))
        .map(|key| key.to_string())
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("expected a sequence") {
        Some("Expected an array for this field (e.g. [\"Delta\", \"United\"]).".into())
    } else if msg.contains("expected a string") {
        Some("Expected a JSON string for this field.".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"question\": \"...\" }).".into())
    } else if msg.contains("missing field") {
        Some("Add the missing field to the request body.".into())
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut Parts) -> String {
    if let Some(v) = parts
        .headers
        .get(REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let now = Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert(REQUEST_ID, value);
    }
    id
}

fn is_json(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Rewrites plain-text 400/422 rejections from axum extractors into the
/// [`ApiResponse`] envelope. JSON bodies (already enveloped) pass through.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    ensure_request_id(&mut parts);

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: hint_from_serde_msg(&original),
    };

    let envelope = ApiResponse::<()>::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        vec![detail],
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}
