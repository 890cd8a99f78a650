//! Event delivery for full page loads.
//!
//! A full page load has no `HX-Trigger` headers to read, so untagged events are
//! rendered into the page itself: a JSON data block the client bootstrap replays
//! through its event dispatcher, and self-removing toast scripts.

use std::fmt;

use axum::http::HeaderMap;
use log::*;
use serde::Serialize;
use serde_json::Value;

use crate::event::{Event, Payload};
use crate::phase::classify;
use crate::transport::is_incremental_exchange;

/// Element id of the initial events data block.
pub const INITIAL_EVENTS_ID: &str = "initial-events";

/// Event name rendered by [`render_toast_markup`].
pub const TOAST_EVENT: &str = "toast";

/// Client function that displays a toast.
pub const SHOW_TOAST_FUNCTION: &str = "showToast";

/// Owned, already-escaped HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Wraps HTML that the caller guarantees is safe to emit as-is.
    pub fn raw(html: impl Into<String>) -> Self {
        Self(html.into())
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize)]
struct InitialEvent<'a> {
    name: &'a str,
    payload: &'a Value,
}

/// Renders the `<script type="application/json" id="initial-events">` block.
///
/// Returns empty markup for HTMX requests (those use [`crate::commit::commit`]) and
/// when there are no untagged events. Phase-tagged events are HTMX-only and filtered
/// out. Events whose payload could not be serialized are skipped.
///
/// Example output:
///
/// ```text
/// <script type="application/json" id="initial-events">[{"name":"toast","payload":{"message":"Welcome!","level":"info"}},{"name":"auth-changed","payload":null}]</script>
/// ```
pub fn render_event_data(request: &HeaderMap, events: &[Event]) -> Markup {
    if is_incremental_exchange(request) {
        return Markup::empty();
    }

    let initial_events: Vec<InitialEvent> = untagged(events)
        .filter_map(|event| {
            json_payload(event).map(|payload| InitialEvent {
                name: event.name(),
                payload,
            })
        })
        .collect();

    if initial_events.is_empty() {
        return Markup::empty();
    }

    match serde_json::to_string(&initial_events) {
        Ok(json) => Markup(format!(
            r#"<script type="application/json" id="{INITIAL_EVENTS_ID}">{}</script>"#,
            escape_script(&json)
        )),
        Err(e) => {
            // Never fail page rendering over events
            error!("Failed to serialize initial events: {e}");
            Markup::empty()
        }
    }
}

/// Renders one self-removing fragment per untagged `toast` event:
///
/// ```text
/// <div><script>showToast({"message":"Welcome!",...})</script><script>me().remove()</script></div>
/// ```
///
/// Returns empty markup for HTMX requests (toasts travel in the `HX-Trigger` header
/// there) and when there are no toast events.
pub fn render_toast_markup(request: &HeaderMap, events: &[Event]) -> Markup {
    if is_incremental_exchange(request) {
        return Markup::empty();
    }

    let mut html = String::new();
    for event in untagged(events).filter(|event| event.name() == TOAST_EVENT) {
        let Some(payload) = json_payload(event) else {
            continue;
        };
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                warn!("Skipping toast with unserializable payload: {e}");
                continue;
            }
        };
        html.push_str(&format!(
            "<div><script>{SHOW_TOAST_FUNCTION}({})</script><script>me().remove()</script></div>",
            escape_script(&json)
        ));
    }

    Markup(html)
}

fn untagged(events: &[Event]) -> impl Iterator<Item = &Event> {
    events
        .iter()
        .filter(|event| classify(event.name()).is_untagged())
}

fn json_payload(event: &Event) -> Option<&Value> {
    match event.payload() {
        Payload::Json(value) => Some(value),
        Payload::Unserializable(message) => {
            warn!(
                "Skipping event `{}` with unserializable payload: {message}",
                event.name()
            );
            None
        }
    }
}

// In serialized JSON these characters only occur inside string literals, where the
// `\uXXXX` form decodes to the same value. Without `<` the payload can neither close
// the script element nor open a comment or a nested script tag.
fn escape_script(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str(r"\u003c"),
            '>' => escaped.push_str(r"\u003e"),
            '&' => escaped.push_str(r"\u0026"),
            _ => escaped.push(c),
        }
    }
    escaped
}
