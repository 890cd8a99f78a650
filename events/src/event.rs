use serde::Serialize;
use serde_json::Value;

/// The payload carried by an [`Event`].
///
/// Payloads are converted to JSON when the event is created. A conversion failure is
/// kept rather than discarded, so each delivery channel can apply its own policy:
/// the header channel fails the affected phase, the inline channel skips the event.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    /// The payload could not be represented as JSON. Holds the serializer's message.
    Unserializable(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Unserializable(_) => None,
        }
    }
}

/// A single named event destined for the browser.
///
/// The name is either bare (`"toast"`) or carries a phase tag
/// (`"HX-Trigger-After-Swap:list-refreshed"`), see [`crate::phase`].
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    name: String,
    payload: Payload,
}

impl Event {
    /// Creates an event from any serializable payload. Use `()` or `None::<T>` for a
    /// null payload.
    pub fn new(name: impl Into<String>, payload: impl Serialize) -> Self {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => Payload::Json(value),
            Err(e) => Payload::Unserializable(e.to_string()),
        };

        Self {
            name: name.into(),
            payload,
        }
    }

    pub fn with_payload(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// The capability to append one event to the current request's event sequence.
///
/// Producers (the phase helper, the toast builder, handlers) depend on this trait
/// instead of a concrete request context.
pub trait EventSink {
    fn push_event(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn push_event(&mut self, event: Event) {
        self.push(event);
    }
}
