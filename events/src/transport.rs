use axum::http::{HeaderMap, HeaderName};

/// Set by HTMX on every request it makes.
pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");

const HX_REQUEST_TOKEN: &str = "true";

/// Returns true when the request is an HTMX partial update (`HX-Request: true`).
///
/// A missing header or any other value means a full page load.
pub fn is_incremental_exchange(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes() == HX_REQUEST_TOKEN.as_bytes())
}
