use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET the health of the server
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}
