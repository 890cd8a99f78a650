//! Fluent builder for toast notifications.
//!
//! A toast is an ordinary untagged `toast` event, so it reaches the browser through
//! the `HX-Trigger` header on HTMX requests and through the initial toast scripts on
//! full page loads.
//!
//! ```rust,ignore
//! ctx.toast("Message")
//!     .success()
//!     .set_timeout(5000)
//!     .set_position(Position::TopRight)
//!     .notify();
//! ```

use std::str::FromStr;

use events::{initial::TOAST_EVENT, Event, EventSink};
use log::*;
use serde::Serialize;

/// Milliseconds a toast stays visible unless configured otherwise.
pub const DEFAULT_TIMEOUT_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

const ICON_SUCCESS: &str = concat!(
    r#"<svg width="20" height="20" viewBox="0 0 20 20" fill="none" xmlns="http://www.w3.org/2000/svg">"#,
    r##"<circle cx="10" cy="10" r="9" stroke="#43a047" stroke-width="2"/>"##,
    r##"<path d="M6 10l2.5 2.5L14 7" stroke="#43a047" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/>"##,
    "</svg>"
);

const ICON_ERROR: &str = concat!(
    r#"<svg width="20" height="20" viewBox="0 0 20 20" fill="none" xmlns="http://www.w3.org/2000/svg">"#,
    r##"<circle cx="10" cy="10" r="9" stroke="#e53935" stroke-width="2"/>"##,
    r##"<path d="M7 7l6 6M13 7l-6 6" stroke="#e53935" stroke-width="2" stroke-linecap="round"/>"##,
    "</svg>"
);

const ICON_WARNING: &str = concat!(
    r#"<svg width="20" height="20" viewBox="0 0 20 20" fill="none" xmlns="http://www.w3.org/2000/svg">"#,
    r##"<path d="M10 2L2 17h16L10 2z" stroke="#fb8c00" stroke-width="2" stroke-linejoin="round"/>"##,
    r##"<path d="M10 8v3M10 14h.01" stroke="#fb8c00" stroke-width="2" stroke-linecap="round"/>"##,
    "</svg>"
);

const ICON_INFO: &str = concat!(
    r#"<svg width="20" height="20" viewBox="0 0 20 20" fill="none" xmlns="http://www.w3.org/2000/svg">"#,
    r##"<circle cx="10" cy="10" r="9" stroke="#1095c1" stroke-width="2"/>"##,
    r##"<path d="M10 9v5M10 6h.01" stroke="#1095c1" stroke-width="2" stroke-linecap="round"/>"##,
    "</svg>"
);

impl Level {
    pub const ALL: [Level; 4] = [Level::Success, Level::Error, Level::Warning, Level::Info];

    /// The name the client receives in the `level` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
        }
    }

    /// Inline SVG shown next to the message, colored for the level.
    pub fn icon(self) -> &'static str {
        match self {
            Level::Success => ICON_SUCCESS,
            Level::Error => ICON_ERROR,
            Level::Warning => ICON_WARNING,
            Level::Info => ICON_INFO,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct LevelParseError;

impl FromStr for Level {
    type Err = LevelParseError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level {
            "success" => Ok(Level::Success),
            "error" => Ok(Level::Error),
            "warning" => Ok(Level::Warning),
            "info" => Ok(Level::Info),
            _ => Err(LevelParseError),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    TopRight,
    BottomLeft,
    TopLeft,
}

/// The payload of a `toast` event as the client's `showToast` receives it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToastMessage {
    pub message: String,
    pub level: Level,
    /// Milliseconds; 0 keeps the toast until dismissed.
    pub timeout: u32,
    pub position: Position,
}

pub struct Toast<'a, S: EventSink + ?Sized> {
    data: ToastMessage,
    sink: &'a mut S,
}

impl<'a, S: EventSink + ?Sized> Toast<'a, S> {
    /// Info level, 3 second timeout, bottom-right.
    pub fn new(message: impl Into<String>, sink: &'a mut S) -> Self {
        Self {
            data: ToastMessage {
                message: message.into(),
                level: Level::default(),
                timeout: DEFAULT_TIMEOUT_MS,
                position: Position::default(),
            },
            sink,
        }
    }

    pub fn success(self) -> Self {
        self.level(Level::Success)
    }

    pub fn error(self) -> Self {
        self.level(Level::Error)
    }

    pub fn warning(self) -> Self {
        self.level(Level::Warning)
    }

    pub fn info(self) -> Self {
        self.level(Level::Info)
    }

    pub fn level(mut self, level: Level) -> Self {
        self.data.level = level;
        self
    }

    /// Sets the level from its name, e.g. when converting a flash message.
    /// Unknown names fall back to info.
    pub fn set_level(self, level: &str) -> Self {
        let level = level.parse().unwrap_or_else(|_| {
            warn!("Unknown toast level `{level}`, using info");
            Level::Info
        });
        self.level(level)
    }

    /// Keeps the toast on screen until dismissed.
    pub fn stay(self) -> Self {
        self.set_timeout(0)
    }

    pub fn set_timeout(mut self, ms: u32) -> Self {
        self.data.timeout = ms;
        self
    }

    pub fn set_position(mut self, position: Position) -> Self {
        self.data.position = position;
        self
    }

    /// Emits the toast as an untagged `toast` event.
    pub fn notify(self) {
        self.sink.push_event(Event::new(TOAST_EVENT, &self.data));
    }
}
