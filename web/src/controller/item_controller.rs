use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use events::{add, Phase};
use log::*;
use serde::Deserialize;
use serde_json::json;

use crate::extractors::hx_request::HxRequest;
use crate::view;
use crate::Context;

const SAMPLE_ITEMS: [&str; 3] = ["Draft agenda", "Book room", "Send invites"];

#[derive(Debug, Deserialize)]
pub struct ItemParams {
    pub name: String,
}

/// GET the items page.
///
/// A full page load greets the user with a toast rendered into the page; a boosted
/// HTMX navigation receives the same toast in the `HX-Trigger` header.
pub async fn index(mut ctx: Context) -> Response {
    debug!("GET items page (htmx: {})", ctx.is_incremental());

    let items: Vec<String> = SAMPLE_ITEMS.iter().map(|item| item.to_string()).collect();
    ctx.toast("Welcome back!").notify();
    // HTMX-only; dropped on full page loads
    add(&mut ctx, Phase::AfterSettle, "items-loaded", json!({ "count": items.len() }));

    let page = view::page(&ctx, "Items", view::item_list(&items));
    ctx.render(page)
}

/// POST a new item.
///
/// HTMX requests get the new row as a fragment, a success toast right away and an
/// `items-refreshed` event once the row has been swapped in. Plain form posts get the
/// full page.
pub async fn create(
    HxRequest(is_htmx): HxRequest,
    mut ctx: Context,
    Form(params): Form<ItemParams>,
) -> Response {
    debug!("POST create item: {params:?}");

    let name = params.name.trim();
    if name.is_empty() {
        ctx.toast("Item name is required").error().stay().notify();
        return (StatusCode::UNPROCESSABLE_ENTITY, ctx, Html("")).into_response();
    }

    ctx.toast(format!("Added \u{201c}{name}\u{201d}")).success().notify();
    let mut items: Vec<String> = SAMPLE_ITEMS.iter().map(|item| item.to_string()).collect();
    items.push(name.to_string());
    add(
        &mut ctx,
        Phase::AfterSwap,
        "items-refreshed",
        json!({ "count": items.len() }),
    );

    if is_htmx {
        let row = view::item_row(name);
        (ctx, Html(row.into_string())).into_response()
    } else {
        let page = view::page(&ctx, "Items", view::item_list(&items));
        ctx.render(page)
    }
}
