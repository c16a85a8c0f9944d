//! CORS layer configuration.

use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use taskgate_core::config::CorsConfig;

use super::rate_limit::{HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET};

/// Builds a CORS tower layer from configuration.
///
/// Rate-limit headers are exposed so browser clients can read them.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    // Origins
    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    // Methods
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    layer
        .allow_methods(methods)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(HEADER_LIMIT),
            HeaderName::from_static(HEADER_REMAINING),
            HeaderName::from_static(HEADER_RESET),
            RETRY_AFTER,
        ])
        .max_age(std::time::Duration::from_secs(config.max_age_seconds))
}
