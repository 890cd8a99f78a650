//! Server-driven browser events for HTMX applications.
//!
//! This crate lets request handlers emit named events that the browser-side
//! dispatcher replays, without a dedicated push channel.
//!
//! # Architecture
//!
//! - **Event**: a name plus a JSON payload
//! - **Phase**: when the client fires the event relative to DOM patching
//!   (`HX-Trigger`, `HX-Trigger-After-Swap`, `HX-Trigger-After-Settle`)
//! - **EventSink**: the one-method capability producers emit through
//! - **EventSequence**: the per-request accumulator, committed at most once
//!
//! # Delivery channels
//!
//! Exactly one channel is active per exchange, chosen by [`is_incremental_exchange`]:
//!
//! - HTMX requests (`HX-Request: true`) get one response header per non-empty phase,
//!   see [`commit::commit`].
//! - Full page loads get an inline `application/json` data block and self-removing
//!   toast scripts, see [`initial::render_event_data`] and [`initial::render_toast_markup`].
//!
//! # Example
//!
//! ```rust
//! use axum::http::HeaderMap;
//! use events::{add, EventSequence, EventSink, Event, Phase};
//!
//! let mut sequence = EventSequence::new();
//! sequence.push_event(Event::new("toast", serde_json::json!({"message": "Saved"})));
//! add(&mut sequence, Phase::AfterSwap, "list-refreshed", 3);
//!
//! let mut request = HeaderMap::new();
//! request.insert("HX-Request", "true".parse().unwrap());
//!
//! let mut response = HeaderMap::new();
//! sequence.commit(&mut response, &request).unwrap();
//! assert!(response.contains_key("HX-Trigger"));
//! assert!(response.contains_key("HX-Trigger-After-Swap"));
//! ```
//!
//! This crate has no dependencies on the web layer. Only the `http` header types are
//! borrowed through axum.

pub mod ascii;
pub mod commit;
pub mod error;
pub mod event;
pub mod initial;
pub mod phase;
pub mod sequence;
pub mod transport;

pub use commit::commit;
pub use error::{Error, ErrorKind};
pub use event::{Event, EventSink, Payload};
pub use initial::{render_event_data, render_toast_markup, Markup};
pub use phase::{add, classify, encode, Classified, Phase};
pub use sequence::{CommitState, EventSequence};
pub use transport::is_incremental_exchange;
