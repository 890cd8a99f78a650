use axum::response::Response;
use events::{add, Phase};
use log::*;

use crate::Context;

/// POST sign out.
///
/// Answers 204 so HTMX swaps nothing; the `auth-changed` event and the toast in the
/// `HX-Trigger` header tell the page to update its signed-in state.
pub async fn delete(mut ctx: Context) -> Response {
    debug!("POST sign out");

    add(&mut ctx, Phase::Immediate, "auth-changed", None::<()>);
    ctx.toast("Signed out").info().notify();

    ctx.no_content()
}
