//! Control-change pattern construction.
//!
//! [`ccp`] builds a [`Pattern`] of `CtrlEvent`s from a list of CC values,
//! cycling a rhythm of slot durations across them (one sixteenth note by
//! default). [`CC`] pairs a channel and CC number for dispatch once the
//! `dispatch` feature is enabled.
//!
//! Grounded in `crispy/ctrl.py`.

use crate::duration::{Duration, BAR, SIXTEENTH};
use crate::model::{Action, Ctrl, Event, Pattern};
use crate::names::random_name;

/// One control-change value to emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CcEvent {
    pub cc: i32,
    pub value: f64,
}

fn ctrl_events(values: &[CcEvent], rhythm: &[Duration]) -> Vec<Event> {
    let mut durations = rhythm.iter().cycle();
    values
        .iter()
        .map(|cev| Event {
            action: Action::CtrlEvent(Ctrl {
                cc: cev.cc,
                value: cev.value,
            }),
            dur: *durations.next().expect("rhythm must not be empty"),
        })
        .collect()
}

/// Builds a one-bar (by default), randomly-named [`Pattern`] of
/// `CtrlEvent`s from `values`, cycling `rhythm`'s slot durations across
/// them. Passing an empty `rhythm` panics, same as the original cycling
/// an empty iterable forever.
pub fn ccp(values: &[CcEvent], rhythm: Option<&[Duration]>, length_bars: Duration) -> Pattern {
    let default_rhythm = [SIXTEENTH];
    let rhythm = rhythm.unwrap_or(&default_rhythm);
    Pattern {
        name: random_name(),
        events: ctrl_events(values, rhythm),
        length_bars,
    }
}

/// Same as [`ccp`] with the default one-bar length.
pub fn ccp_default(values: &[CcEvent]) -> Pattern {
    ccp(values, None, BAR)
}

/// A channel/CC-number pair, ready to dispatch a pattern under the
/// `dispatch` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cc {
    pub channel: u8,
    pub number: i32,
}

impl Cc {
    pub fn new(channel: u8, number: i32) -> Self {
        assert!((1..=16).contains(&channel), "channel must be in 1..=16");
        Self { channel, number }
    }

    #[cfg(feature = "dispatch")]
    pub fn play(
        &self,
        client: &crate::dispatch::DispatchClient,
        pattern: Pattern,
    ) -> Result<(), crate::dispatch::DispatchError> {
        let renamed = pattern | crate::combinators::name(format!("cc{}", self.number));
        client.play(&renamed, Some(self.channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_rhythm_across_values() {
        let values: Vec<CcEvent> = (1..=16)
            .map(|n| CcEvent {
                cc: 102,
                value: 1.0 / n as f64,
            })
            .collect();
        let pattern = ccp_default(&values);
        assert_eq!(pattern.events.len(), 16);
        for ev in &pattern.events {
            assert_eq!(ev.dur, SIXTEENTH);
        }
        assert_eq!(pattern.length_bars, BAR);
        match pattern.events[0].action {
            Action::CtrlEvent(c) => {
                assert_eq!(c.cc, 102);
                assert_eq!(c.value, 1.0);
            }
            _ => panic!("expected a ctrl event"),
        }
    }
}
