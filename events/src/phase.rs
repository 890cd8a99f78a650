//! Phase tags and the `"<token>:<name>"` wire-name convention.
//!
//! Phase-tagged events are stored in the event sequence with their header token as a
//! prefix (`"HX-Trigger-After-Swap:list-refreshed"`). Only this module turns phases
//! into strings and back.

use axum::http::HeaderName;
use serde::Serialize;
use std::fmt;

use crate::event::{Event, EventSink};

const SEPARATOR: char = ':';

/// When an HTMX client fires an event, relative to swapping the response into the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Fires as soon as the response is received. Header: `HX-Trigger`
    Immediate,
    /// Fires after the content is swapped into the DOM. Header: `HX-Trigger-After-Swap`
    AfterSwap,
    /// Fires after the settle step completes. Header: `HX-Trigger-After-Settle`
    AfterSettle,
}

impl Phase {
    /// All phases, in the order names are checked against them.
    pub const ALL: [Phase; 3] = [Phase::Immediate, Phase::AfterSwap, Phase::AfterSettle];

    /// The header token, also used as the wire-name prefix.
    pub fn token(self) -> &'static str {
        match self {
            Phase::Immediate => "HX-Trigger",
            Phase::AfterSwap => "HX-Trigger-After-Swap",
            Phase::AfterSettle => "HX-Trigger-After-Settle",
        }
    }

    pub fn header_name(self) -> HeaderName {
        // HeaderName::from_static only accepts lowercase
        match self {
            Phase::Immediate => HeaderName::from_static("hx-trigger"),
            Phase::AfterSwap => HeaderName::from_static("hx-trigger-after-swap"),
            Phase::AfterSettle => HeaderName::from_static("hx-trigger-after-settle"),
        }
    }

    fn strip<'a>(self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix(self.token())?.strip_prefix(SEPARATOR)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The result of inspecting an event name for a phase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    Tagged { phase: Phase, bare: &'a str },
    Untagged(&'a str),
}

impl<'a> Classified<'a> {
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Classified::Tagged { phase, .. } => Some(*phase),
            Classified::Untagged(_) => None,
        }
    }

    pub fn bare_name(&self) -> &'a str {
        match self {
            Classified::Tagged { bare, .. } => *bare,
            Classified::Untagged(name) => *name,
        }
    }

    pub fn is_untagged(&self) -> bool {
        matches!(self, Classified::Untagged(_))
    }
}

/// Builds the wire name for a phase-tagged event.
pub fn encode(phase: Phase, bare: &str) -> String {
    format!("{}{SEPARATOR}{bare}", phase.token())
}

/// Splits a wire name into its phase and bare name.
///
/// Phases are tested in [`Phase::ALL`] order and the first matching prefix wins.
/// Names without a recognized prefix are [`Classified::Untagged`].
pub fn classify(name: &str) -> Classified<'_> {
    Phase::ALL
        .into_iter()
        .find_map(|phase| phase.strip(name).map(|bare| Classified::Tagged { phase, bare }))
        .unwrap_or(Classified::Untagged(name))
}

/// Emits an event for a specific phase.
///
/// Phase-tagged events are delivered only through response headers on HTMX requests.
/// They never appear in the initial-events block of a full page load.
pub fn add<S>(sink: &mut S, phase: Phase, name: &str, payload: impl Serialize)
where
    S: EventSink + ?Sized,
{
    sink.push_event(Event::new(encode(phase, name), payload));
}
