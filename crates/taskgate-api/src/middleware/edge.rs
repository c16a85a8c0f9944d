//! Router-level adapter for the perimeter gate.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use taskgate_edge::EdgeGate;

use crate::error::ApiError;

/// `from_fn_with_state(gate, edge_gate)`.
///
/// Rejects before any route-level pipeline runs. Admitted requests carry
/// the forwarded `x-user-*` headers; spoofed ones are always stripped.
pub async fn edge_gate(
    State(gate): State<Arc<EdgeGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = gate.check(request.method(), request.uri().path(), request.headers());
    match decision {
        Ok(decision) => {
            decision.forward(request.headers_mut());
            next.run(request).await
        }
        Err(err) => {
            debug!(method = %request.method(), path = %request.uri().path(), error = %err, "Edge rejected request");
            ApiError::from(err).into_response()
        }
    }
}
