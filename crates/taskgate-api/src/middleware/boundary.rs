//! Outermost error boundary.
//!
//! Handlers and stages render server-side failures with the generic
//! message and stash the real detail in an [`InternalDetail`] extension.
//! In the development posture the detail is copied into the body as
//! `"detail"`; in production it never leaves the process.

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};

use taskgate_core::config::Posture;

use crate::error::InternalDetail;

/// Envelopes larger than this are passed through untouched.
const MAX_ENVELOPE_BYTES: usize = 64 * 1024;

/// `from_fn_with_state(posture, error_boundary)`.
pub async fn error_boundary(
    State(posture): State<Posture>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(InternalDetail(detail)) = response.extensions_mut().remove::<InternalDetail>() else {
        return response;
    };
    if !posture.is_development() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let Ok(bytes) = to_bytes(body, MAX_ENVELOPE_BYTES).await else {
        return Response::from_parts(parts, Body::empty());
    };
    let Ok(mut envelope) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    if let Some(obj) = envelope.as_object_mut() {
        obj.insert("detail".into(), serde_json::Value::String(detail));
    }

    let body = serde_json::to_vec(&envelope).unwrap_or_else(|_| bytes.to_vec());
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.insert(
        CONTENT_TYPE,
        axum::http::HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(body))
}
