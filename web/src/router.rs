use crate::controller::{health_check_controller, item_controller, user_session_controller};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use events::Phase;
use log::*;
use service::{config::Config, AppState};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Request headers HTMX sends along with `HX-Request`.
const HTMX_REQUEST_HEADERS: [&str; 5] = [
    "hx-request",
    "hx-current-url",
    "hx-target",
    "hx-trigger",
    "hx-trigger-name",
];

pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config);

    Router::new()
        .merge(health_routes())
        .merge(item_routes(app_state.clone()))
        .merge(user_session_routes(app_state))
        .layer(cors)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn item_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(item_controller::index))
        .route("/items", post(item_controller::create))
        .with_state(app_state)
}

fn user_session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/logout", post(user_session_controller::delete))
        .with_state(app_state)
}

// Cross-origin HTMX clients can only read the event headers if they are exposed.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin `{origin}`: {e}");
                None
            }
        })
        .collect();

    let mut allowed_headers: Vec<HeaderName> = HTMX_REQUEST_HEADERS
        .into_iter()
        .map(HeaderName::from_static)
        .collect();
    allowed_headers.push(header::CONTENT_TYPE);

    let exposed_headers: Vec<HeaderName> = Phase::ALL.into_iter().map(Phase::header_name).collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(allowed_headers)
        .expose_headers(exposed_headers)
        .allow_credentials(true)
}
