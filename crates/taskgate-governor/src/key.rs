//! Client key derivation.

use std::net::IpAddr;

use http::HeaderMap;

/// Key used when no client address header is present.
pub const UNKNOWN_KEY: &str = "unknown";

/// Headers consulted in order; the first non-empty one wins.
const CLIENT_HEADERS: [&str; 3] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip"];

/// Derives the rate key for a request.
///
/// Takes the first entry of `X-Forwarded-For`, then `X-Real-IP`, then
/// `CF-Connecting-IP`, else [`UNKNOWN_KEY`].
pub fn client_key(headers: &HeaderMap) -> String {
    CLIENT_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_KEY)
        .to_string()
}

/// Whether the key names a loopback address.
pub fn is_loopback(key: &str) -> bool {
    key.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback()) || key == "::ffff:127.0.0.1"
}
