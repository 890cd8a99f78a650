use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, Method, StatusCode};
use axum::response::{Html, IntoResponse, IntoResponseParts, Response, ResponseParts};
use events::{is_incremental_exchange, Event, EventSequence, EventSink, Markup};
use log::*;
use serde::Serialize;

use crate::toast::Toast;

/// The request-scoped context handlers emit browser events through.
///
/// Extracted once per request and owned by the handler; it is never shared with
/// other requests. Events are committed to `HX-Trigger*` headers by whichever comes
/// first: [`Context::render`], [`Context::no_content`], or returning the context as
/// part of the response (`(ctx, body)`). Later commits are no-ops.
#[derive(Debug)]
pub struct Context {
    method: Method,
    path: String,
    request_headers: HeaderMap,
    events: EventSequence,
}

impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Context::from_parts(parts))
    }
}

impl Context {
    pub(crate) fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_owned(),
            request_headers: parts.headers.clone(),
            events: EventSequence::new(),
        }
    }

    /// Adds an untagged event. On HTMX requests it is sent in the `HX-Trigger` header,
    /// on full page loads it is rendered into the initial-events block.
    pub fn event(&mut self, name: impl Into<String>, payload: impl Serialize) {
        self.push_event(Event::new(name, payload));
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// Starts a toast notification that is emitted on `notify()`.
    ///
    /// ```rust,ignore
    /// ctx.toast("User created").success().notify();
    /// ctx.toast("Error occurred").error().stay().notify();
    /// ```
    pub fn toast(&mut self, message: impl Into<String>) -> Toast<'_, Self> {
        Toast::new(message, self)
    }

    pub fn is_incremental(&self) -> bool {
        is_incremental_exchange(&self.request_headers)
    }

    /// The initial-events data block; empty on HTMX requests.
    pub fn initial_events(&self) -> Markup {
        self.events.render_event_data(&self.request_headers)
    }

    /// Self-removing toast scripts; empty on HTMX requests.
    pub fn initial_toasts(&self) -> Markup {
        self.events.render_toast_markup(&self.request_headers)
    }

    /// Writes the accumulated events to `HX-Trigger*` headers. Safe to call more than
    /// once; only the first call writes.
    ///
    /// Encoding failures are logged and never fail the response.
    pub fn commit_events(&mut self, response_headers: &mut HeaderMap) {
        if let Err(e) = self.events.commit(response_headers, &self.request_headers) {
            error!(
                "Failed to commit events for {} {}: {e}",
                self.method, self.path
            );
        }
    }

    /// Renders HTML with `Content-Type: text/html; charset=utf-8` and committed events.
    pub fn render(&mut self, markup: Markup) -> Response {
        let mut response = Html(markup.into_string()).into_response();
        self.commit_events(response.headers_mut());
        response
    }

    /// A 204 response carrying the committed events.
    ///
    /// ```rust,ignore
    /// ctx.toast("Operation successful").success().notify();
    /// ctx.no_content()
    /// ```
    pub fn no_content(&mut self) -> Response {
        let mut response = StatusCode::NO_CONTENT.into_response();
        self.commit_events(response.headers_mut());
        response
    }
}

impl EventSink for Context {
    fn push_event(&mut self, event: Event) {
        trace!("{} {}: event `{}`", self.method, self.path, event.name());
        self.events.push_event(event);
    }
}

// Lets handlers return `(ctx, body)` and have events committed on the way out.
impl IntoResponseParts for Context {
    type Error = Infallible;

    fn into_response_parts(mut self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.commit_events(res.headers_mut());
        Ok(res)
    }
}
