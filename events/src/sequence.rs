use axum::http::HeaderMap;
use log::*;

use crate::commit::commit;
use crate::error::Error;
use crate::event::{Event, EventSink};
use crate::initial::{render_event_data, render_toast_markup, Markup};
use crate::phase::{classify, encode, Classified, Phase};

/// Whether an [`EventSequence`] has been written to response headers yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitState {
    #[default]
    Pending,
    Committed,
}

/// The ordered events accumulated while handling a single request.
///
/// Owned by the request's handling context; nothing is shared between requests.
/// [`EventSequence::commit`] writes the headers at most once, so it can be called from
/// both an explicit response helper and a generic fallback without double emission.
#[derive(Debug, Default)]
pub struct EventSequence {
    events: Vec<Event>,
    state: CommitState,
}

impl EventSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn state(&self) -> CommitState {
        self.state
    }

    pub fn is_committed(&self) -> bool {
        self.state == CommitState::Committed
    }

    /// Commits the accumulated events to `HX-Trigger*` response headers.
    ///
    /// Untagged events are sent in the `HX-Trigger` header, so an event emitted without
    /// a phase still reaches HTMX clients immediately. Any call after the first is a
    /// no-op returning `Ok(())`.
    pub fn commit(&mut self, response: &mut HeaderMap, request: &HeaderMap) -> Result<(), Error> {
        if self.is_committed() {
            debug!("Events already committed, skipping");
            return Ok(());
        }
        self.state = CommitState::Committed;

        let events: Vec<Event> = self.events.iter().map(with_default_phase).collect();
        commit(response, request, &events)
    }

    /// The initial-events data block for a full page load.
    pub fn render_event_data(&self, request: &HeaderMap) -> Markup {
        render_event_data(request, &self.events)
    }

    /// The self-removing toast scripts for a full page load.
    pub fn render_toast_markup(&self, request: &HeaderMap) -> Markup {
        render_toast_markup(request, &self.events)
    }
}

impl EventSink for EventSequence {
    fn push_event(&mut self, event: Event) {
        if classify(event.name()).bare_name().is_empty() {
            warn!("Ignoring event with empty name `{}`", event.name());
            return;
        }
        if self.is_committed() {
            warn!(
                "Event `{}` added after headers were committed; it can only reach the page body",
                event.name()
            );
        }
        self.events.push(event);
    }
}

fn with_default_phase(event: &Event) -> Event {
    match classify(event.name()) {
        Classified::Tagged { .. } => event.clone(),
        Classified::Untagged(name) => Event::with_payload(
            encode(Phase::Immediate, name),
            event.payload().clone(),
        ),
    }
}
