//! Error types for the `events` crate.
//!
//! Follows the same pattern as the other crates in this workspace: a root `Error`
//! struct holding an `error_kind` plus the optional underlying `source`.
use std::error::Error as StdError;
use std::fmt;

use crate::phase::Phase;

#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// These phase buckets could not be encoded into a header value and were not written.
    /// Headers for the remaining phases were written as usual.
    PhaseEncoding(Vec<Phase>),
}

impl Error {
    pub(crate) fn phase_encoding(
        phases: Vec<Phase>,
        source: Option<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Error {
            source,
            error_kind: ErrorKind::PhaseEncoding(phases),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::PhaseEncoding(phases) => {
                let names: Vec<&str> = phases.iter().map(|phase| phase.token()).collect();
                write!(f, "Events Error: failed to encode events for {}", names.join(", "))?;
            }
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
