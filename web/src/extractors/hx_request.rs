use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use events::is_incremental_exchange;

/// Whether the current request is an HTMX partial update (`HX-Request: true`).
///
/// Handlers use this to choose between a full page and a fragment. It never rejects:
/// a missing or unexpected header means a full page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(HxRequest(is_incremental_exchange(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> HxRequest {
        let (mut parts, _body) = request.into_parts();
        HxRequest::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_htmx_request() {
        let request = Request::builder()
            .header("HX-Request", "true")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await, HxRequest(true));
    }

    #[tokio::test]
    async fn test_plain_request() {
        let request = Request::builder().body(()).unwrap();

        assert_eq!(extract(request).await, HxRequest(false));
    }

    #[tokio::test]
    async fn test_wrong_value() {
        let request = Request::builder()
            .header("HX-Request", "false")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await, HxRequest(false));
    }
}
