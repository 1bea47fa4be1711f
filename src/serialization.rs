//! Canonical JSON rendering of the pattern envelope.
//!
//! [`Pattern`] already derives a field-ordered `Serialize`/`Deserialize`
//! (see [`crate::model`]) that gives the canonical `{"name":...,
//! "events":...,"length_bars":...}` shape spec.md §4.7 asks for, compact
//! and with no custom logic needed. This module additionally builds the
//! *dispatch envelope* spec.md §6 describes — `{"events":[...],
//! "channel":...}`, the shape the external plugin actually expects on
//! `/start/<name>` — and keeps both the CLI and [`crate::dispatch`] using
//! the exact same struct so the two surfaces can't drift apart.

use crate::model::{Event, Pattern};
use serde::Serialize;

/// The request body sent to (or, without `--dispatch`, printed in place
/// of sending to) the external plugin's `/start/<name>` endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub events: &'a [Event],
    pub channel: u8,
}

impl<'a> Envelope<'a> {
    pub fn new(pattern: &'a Pattern, channel: u8) -> Self {
        assert!((1..=16).contains(&channel), "channel must be in 1..=16");
        Self {
            events: &pattern.events,
            channel,
        }
    }
}

/// Renders `pattern`'s full canonical form (name, events, length_bars) as
/// compact JSON with no whitespace.
pub fn pattern_to_json(pattern: &Pattern) -> String {
    serde_json::to_string(pattern).expect("Pattern serialization is infallible")
}

/// Renders the `{"events":[...],"channel":n}` dispatch envelope for
/// `pattern` on `channel` as compact JSON.
pub fn envelope_to_json(pattern: &Pattern, channel: u8) -> String {
    let envelope = Envelope::new(pattern, channel);
    serde_json::to_string(&envelope).expect("Envelope serialization is infallible")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{BAR, HALF};

    #[test]
    fn envelope_has_only_events_and_channel() {
        let pattern = Pattern {
            name: "foo".into(),
            events: vec![Event::note(60, 0.58, HALF, BAR)],
            length_bars: BAR,
        };
        let json = envelope_to_json(&pattern, 3);
        assert!(json.starts_with("{\"events\":["));
        assert!(json.ends_with("\"channel\":3}"));
        assert!(!json.contains("\"name\""));
        assert!(!json.contains("length_bars"));
    }

    #[test]
    fn pattern_json_is_compact_and_field_ordered() {
        let pattern = Pattern {
            name: "foo".into(),
            events: vec![Event::rest(HALF)],
            length_bars: HALF,
        };
        let json = pattern_to_json(&pattern);
        assert!(json.starts_with("{\"name\":\"foo\",\"events\":["));
        assert!(!json.contains(' '));
        assert!(!json.contains('\n'));
    }

    #[test]
    #[should_panic]
    fn envelope_rejects_out_of_range_channel() {
        let pattern = Pattern::empty("foo", BAR);
        let _ = Envelope::new(&pattern, 17);
    }
}
