use std::collections::BTreeMap;
use std::error::Error as StdError;

use axum::http::{HeaderMap, HeaderValue};
use log::*;
use serde_json::{Map, Value};

use crate::ascii::escape_non_ascii;
use crate::error::Error;
use crate::event::{Event, Payload};
use crate::phase::{classify, Classified, Phase};
use crate::transport::is_incremental_exchange;

/// Writes phase-tagged events to `HX-Trigger*` response headers.
///
/// Only HTMX requests are handled; for full page loads this is a no-op and the
/// events are rendered by [`crate::initial`] instead. Untagged events are ignored here.
///
/// Each non-empty phase produces exactly one header whose value is a JSON object of
/// bare event name to payload. When the same name appears twice in a phase, the later
/// payload wins. Events with an empty bare name are skipped. Header values are ASCII-only, see [`crate::ascii`].
///
/// Example output headers:
///
/// ```text
/// HX-Trigger: {"auth-changed":true,"toast":{"level":"success","message":"Saved"}}
/// HX-Trigger-After-Swap: {"refresh-stats":{"count":42}}
/// ```
///
/// A phase whose events cannot be encoded is skipped and reported in the returned
/// error; headers for the other phases are still written.
pub fn commit(response: &mut HeaderMap, request: &HeaderMap, events: &[Event]) -> Result<(), Error> {
    if !is_incremental_exchange(request) {
        return Ok(());
    }

    let mut buckets: BTreeMap<Phase, BTreeMap<&str, &Payload>> = BTreeMap::new();
    for event in events {
        if let Classified::Tagged { phase, bare } = classify(event.name()) {
            if bare.is_empty() {
                warn!("Skipping {phase} event with an empty name");
                continue;
            }
            buckets.entry(phase).or_default().insert(bare, event.payload());
        }
    }

    let mut failed = Vec::new();
    let mut first_source = None;

    for (phase, bucket) in buckets {
        match encode_bucket(&bucket) {
            Ok(value) => {
                trace!("Setting {phase} header with {} event(s)", bucket.len());
                response.insert(phase.header_name(), value);
            }
            Err(e) => {
                warn!("Failed to encode events for {phase}: {e}");
                failed.push(phase);
                if first_source.is_none() {
                    first_source = Some(e);
                }
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::phase_encoding(failed, first_source))
    }
}

fn encode_bucket(
    bucket: &BTreeMap<&str, &Payload>,
) -> Result<HeaderValue, Box<dyn StdError + Send + Sync>> {
    let mut object = Map::new();
    for (name, payload) in bucket {
        match payload {
            Payload::Json(value) => {
                object.insert((*name).to_owned(), value.clone());
            }
            Payload::Unserializable(message) => {
                return Err(
                    format!("payload of event `{name}` is not serializable: {message}").into(),
                );
            }
        }
    }

    let json = serde_json::to_string(&Value::Object(object))?;
    Ok(HeaderValue::from_str(&escape_non_ascii(&json))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::phase::encode;
    use crate::transport::HX_REQUEST;
    use serde_json::json;
    use std::collections::HashMap;

    fn htmx_request() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        headers
    }

    fn header_json(headers: &HeaderMap, phase: Phase) -> Value {
        let value = headers
            .get(phase.header_name())
            .unwrap_or_else(|| panic!("{phase} header should be set"));
        serde_json::from_str(value.to_str().unwrap()).unwrap()
    }

    fn unserializable() -> HashMap<(u8, u8), u8> {
        HashMap::from([((1, 2), 3)])
    }

    #[test]
    fn test_full_page_request_sets_no_headers() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new("HX-Trigger:test-event", "data")];

        commit(&mut response, &HeaderMap::new(), &events).unwrap();

        assert!(response.is_empty());
    }

    #[test]
    fn test_full_page_request_ignores_unserializable_payloads() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new("HX-Trigger:broken", unserializable())];

        assert!(commit(&mut response, &HeaderMap::new(), &events).is_ok());
        assert!(response.is_empty());
    }

    #[test]
    fn test_immediate_event() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new("HX-Trigger:test-event", "test-data")];

        commit(&mut response, &htmx_request(), &events).unwrap();

        assert_eq!(
            header_json(&response, Phase::Immediate),
            json!({"test-event": "test-data"})
        );
    }

    #[test]
    fn test_one_header_per_phase() {
        let mut response = HeaderMap::new();
        let events = vec![
            Event::new(encode(Phase::Immediate, "toast"), json!({"message": "ok"})),
            Event::new(encode(Phase::AfterSwap, "refresh"), json!({"count": 3})),
        ];

        commit(&mut response, &htmx_request(), &events).unwrap();

        assert_eq!(response.len(), 2);
        assert_eq!(
            header_json(&response, Phase::Immediate),
            json!({"toast": {"message": "ok"}})
        );
        assert_eq!(
            header_json(&response, Phase::AfterSwap),
            json!({"refresh": {"count": 3}})
        );
        assert!(response.get(Phase::AfterSettle.header_name()).is_none());
    }

    #[test]
    fn test_all_three_phases() {
        let mut response = HeaderMap::new();
        let events: Vec<Event> = Phase::ALL
            .into_iter()
            .map(|phase| Event::new(encode(phase, "evt"), phase.token()))
            .collect();

        commit(&mut response, &htmx_request(), &events).unwrap();

        for phase in Phase::ALL {
            assert_eq!(header_json(&response, phase), json!({"evt": phase.token()}));
        }
    }

    #[test]
    fn test_multiple_events_same_phase() {
        let mut response = HeaderMap::new();
        let events = vec![
            Event::new("HX-Trigger:event1", "data1"),
            Event::new("HX-Trigger:event2", "data2"),
        ];

        commit(&mut response, &htmx_request(), &events).unwrap();

        assert_eq!(
            header_json(&response, Phase::Immediate),
            json!({"event1": "data1", "event2": "data2"})
        );
    }

    #[test]
    fn test_same_name_last_write_wins() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new("HX-Trigger:x", 1), Event::new("HX-Trigger:x", 2)];

        commit(&mut response, &htmx_request(), &events).unwrap();

        assert_eq!(response.get("HX-Trigger").unwrap(), r#"{"x":2}"#);
    }

    #[test]
    fn test_untagged_events_are_ignored() {
        let mut response = HeaderMap::new();
        let events = vec![
            Event::new("no-prefix-event", "data"),
            Event::new("HX-Trigger-Later:unknown", "data"),
        ];

        commit(&mut response, &htmx_request(), &events).unwrap();

        assert!(response.is_empty());
    }

    #[test]
    fn test_null_payload_is_kept_as_null() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new("HX-Trigger:auth-changed", ())];

        commit(&mut response, &htmx_request(), &events).unwrap();

        let data = header_json(&response, Phase::Immediate);
        assert_eq!(data.get("auth-changed"), Some(&Value::Null));
    }

    #[test]
    fn test_non_ascii_payload_is_escaped() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new(
            "HX-Trigger:toast",
            json!({"message": "caf\u{e9} \u{1F600}"}),
        )];

        commit(&mut response, &htmx_request(), &events).unwrap();

        let raw = response.get("HX-Trigger").unwrap().as_bytes();
        assert!(raw.iter().all(|b| *b < 0x80));
        assert_eq!(
            raw,
            br#"{"toast":{"message":"caf\u00e9 \ud83d\ude00"}}"#.as_slice()
        );
        assert_eq!(
            header_json(&response, Phase::Immediate),
            json!({"toast": {"message": "caf\u{e9} \u{1F600}"}})
        );
    }

    #[test]
    fn test_commit_twice_replaces_instead_of_appending() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new("HX-Trigger:refresh", true)];

        commit(&mut response, &htmx_request(), &events).unwrap();
        commit(&mut response, &htmx_request(), &events).unwrap();

        assert_eq!(response.get_all("HX-Trigger").iter().count(), 1);
    }

    #[test]
    fn test_unserializable_payload_fails_only_its_phase() {
        let mut response = HeaderMap::new();
        let events = vec![
            Event::new("HX-Trigger:broken", unserializable()),
            Event::new("HX-Trigger-After-Swap:refresh", 1),
        ];

        let err = commit(&mut response, &htmx_request(), &events).unwrap_err();

        assert_eq!(err.error_kind, ErrorKind::PhaseEncoding(vec![Phase::Immediate]));
        assert!(err.to_string().contains("HX-Trigger"));
        assert!(response.get(Phase::Immediate.header_name()).is_none());
        assert_eq!(header_json(&response, Phase::AfterSwap), json!({"refresh": 1}));
    }

    #[test]
    fn test_every_failing_phase_is_reported() {
        let mut response = HeaderMap::new();
        let events = vec![
            Event::new("HX-Trigger-After-Settle:late", unserializable()),
            Event::new("HX-Trigger-After-Swap:refresh", 1),
            Event::new("HX-Trigger:broken", unserializable()),
        ];

        let err = commit(&mut response, &htmx_request(), &events).unwrap_err();

        assert_eq!(
            err.error_kind,
            ErrorKind::PhaseEncoding(vec![Phase::Immediate, Phase::AfterSettle])
        );
        assert!(err
            .to_string()
            .contains("failed to encode events for HX-Trigger, HX-Trigger-After-Settle"));
        // The source is the first failure in phase order
        assert!(err.source.as_ref().unwrap().to_string().contains("`broken`"));
        assert_eq!(response.len(), 1);
        assert_eq!(header_json(&response, Phase::AfterSwap), json!({"refresh": 1}));
    }

    #[test]
    fn test_empty_bare_names_are_skipped() {
        let mut response = HeaderMap::new();
        let events = vec![
            Event::new("HX-Trigger:", 1),
            Event::new("HX-Trigger-After-Swap:", 2),
            Event::new("HX-Trigger:kept", 3),
        ];

        commit(&mut response, &htmx_request(), &events).unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(header_json(&response, Phase::Immediate), json!({"kept": 3}));
    }

    #[test]
    fn test_overwritten_unserializable_payload_does_not_fail() {
        let mut response = HeaderMap::new();
        let events = vec![
            Event::new("HX-Trigger:x", unserializable()),
            Event::new("HX-Trigger:x", "fine"),
        ];

        commit(&mut response, &htmx_request(), &events).unwrap();

        assert_eq!(header_json(&response, Phase::Immediate), json!({"x": "fine"}));
    }

    #[test]
    fn test_complex_payload() {
        let mut response = HeaderMap::new();
        let events = vec![Event::new(
            "HX-Trigger:toast",
            json!({"message": "Hello", "level": "success", "timeout": 3000}),
        )];

        commit(&mut response, &htmx_request(), &events).unwrap();

        let data = header_json(&response, Phase::Immediate);
        assert_eq!(data["toast"]["message"], "Hello");
        assert_eq!(data["toast"]["timeout"], 3000);
    }
}
