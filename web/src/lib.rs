//! HTTP layer: axum routes and the request-scoped event context.
//!
//! Handlers take a [`Context`] extractor, emit events through it, and either call one
//! of its response helpers or return it as part of the response. Either way the
//! accumulated events are committed to `HX-Trigger*` headers exactly once.
//!
//! ```rust,ignore
//! async fn save(mut ctx: Context) -> impl IntoResponse {
//!     ctx.toast("Saved").success().notify();
//!     events::add(&mut ctx, Phase::AfterSwap, "list-refreshed", json!({"count": 3}));
//!     (ctx, Html("<li>saved</li>"))
//! }
//! ```

use log::*;
use service::AppState;
use tokio::net::TcpListener;

mod context;
mod controller;
mod error;
pub(crate) mod extractors;
pub mod router;
pub mod toast;
pub mod view;

pub use context::Context;
pub use error::{Error, Result, WebErrorKind};

pub async fn init_server(app_state: AppState) -> Result<()> {
    let listen_address = app_state.config.listen_address();
    info!("Server starting... listening for connections on http://{listen_address}");

    let listener = TcpListener::bind(&listen_address).await?;
    axum::serve(listener, router::define_routes(app_state)).await?;

    Ok(())
}
