//! Event and pattern data types.
//!
//! A [`Pattern`] is an immutable value: a name, an ordered list of [`Event`]s
//! whose slot durations sum exactly to `length_bars`, and that declared
//! length. Every combinator in [`crate::combinators`] consumes a `Pattern`
//! and produces a new one; nothing here is ever mutated in place once built.

use crate::duration::{Duration, ZERO};
use serde::{Deserialize, Serialize};

/// A single MIDI-style note: `note_num` is taken modulo 128 by
/// [`Note::transpose`], velocity is expected in `[0.0, 1.0]`, and `dur` is
/// the note-on-to-note-off length — independent of the event's own slot
/// duration (a short slot can hold a long-sustaining note).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_num: i32,
    pub velocity: f64,
    pub dur: Duration,
}

impl Note {
    pub fn new(note_num: i32, velocity: f64, dur: Duration) -> Self {
        Self {
            note_num,
            velocity,
            dur,
        }
    }

    /// Transposes by `amount` semitones, wrapping into `[0, 128)`.
    pub fn transpose(self, amount: i32) -> Self {
        Self {
            note_num: (self.note_num + amount).rem_euclid(128),
            ..self
        }
    }

    pub fn set_dur(self, dur: Duration) -> Self {
        Self { dur, ..self }
    }
}

/// A control-change event. Carries no internal duration of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ctrl {
    pub cc: i32,
    pub value: f64,
}

/// The tagged action an [`Event`] performs. Serializes (via serde's default
/// externally-tagged representation) as `{"NoteEvent": {...}}`,
/// `{"CtrlEvent": {...}}`, or the bare string `"Rest"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    NoteEvent(Note),
    CtrlEvent(Ctrl),
    Rest,
}

impl Action {
    pub fn is_note(&self) -> bool {
        matches!(self, Action::NoteEvent(_))
    }

    pub fn is_ctrl(&self) -> bool {
        matches!(self, Action::CtrlEvent(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Action::Rest)
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Action::NoteEvent(n) => Some(n),
            _ => None,
        }
    }
}

/// A timed slot on the pattern's timeline: `action` is what happens, `dur`
/// is how long the slot occupies before the next event begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub action: Action,
    pub dur: Duration,
}

impl Event {
    pub fn note(note_num: i32, velocity: f64, note_dur: Duration, slot_dur: Duration) -> Self {
        Self {
            action: Action::NoteEvent(Note::new(note_num, velocity, note_dur)),
            dur: slot_dur,
        }
    }

    pub fn rest(slot_dur: Duration) -> Self {
        Self {
            action: Action::Rest,
            dur: slot_dur,
        }
    }

    pub fn ctrl(cc: i32, value: f64, slot_dur: Duration) -> Self {
        Self {
            action: Action::CtrlEvent(Ctrl { cc, value }),
            dur: slot_dur,
        }
    }

    /// Extends this event's slot duration in place (the `_` tie operator).
    pub fn extend_slot(&mut self, extra: Duration) {
        self.dur = self.dur + extra;
    }

    /// Scales the slot duration by `factor`; if this event wraps a `Note`,
    /// the note's own internal duration is *replaced* by the new slot
    /// duration (slot `dur` times `factor`), not scaled from its prior
    /// value. Grounded in `Event.__mul__` in the original Python source,
    /// which rebuilds the note with `dur=self.dur * mul` — the event's own
    /// slot duration times the factor — discarding whatever the note's
    /// internal duration held before. `each` relies on this to move both
    /// the timeline slot and the sounding length together, while
    /// `each_note` (see [`crate::combinators::each_note`]) only ever
    /// touches the note directly and leaves the slot alone.
    pub fn scale(self, factor: Duration) -> Self {
        let new_slot = self.dur * factor;
        match self.action {
            Action::NoteEvent(note) => Self {
                action: Action::NoteEvent(note.set_dur(new_slot)),
                dur: new_slot,
            },
            _ => Self {
                dur: new_slot,
                ..self
            },
        }
    }
}

/// An immutable, compiled pattern: a name, its ordered events, and the
/// exact declared length those events' slot durations must sum to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub events: Vec<Event>,
    pub length_bars: Duration,
}

impl Pattern {
    pub fn empty(name: impl Into<String>, length_bars: Duration) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
            length_bars,
        }
    }

    /// The list of slot durations, in order — `rhythm()` in the original.
    pub fn rhythm(&self) -> Vec<Duration> {
        self.events.iter().map(|e| e.dur).collect()
    }

    /// Sum of every event's slot duration. Should always equal
    /// `length_bars` on a well-formed pattern; exposed so callers (and
    /// tests) can assert the invariant explicitly.
    pub fn total_duration(&self) -> Duration {
        self.events.iter().map(|e| e.dur).sum::<Duration>()
    }

    pub fn is_well_formed(&self) -> bool {
        if self.events.is_empty() {
            return true;
        }
        self.total_duration() == self.length_bars
    }
}

impl std::ops::Add for Pattern {
    type Output = Pattern;
    /// Concatenation: events concatenated, lengths added, name from the
    /// left operand.
    fn add(self, rhs: Pattern) -> Pattern {
        let mut events = self.events;
        events.extend(rhs.events);
        Pattern {
            name: self.name,
            events,
            length_bars: self.length_bars + rhs.length_bars,
        }
    }
}

impl std::ops::Mul<usize> for Pattern {
    type Output = Pattern;
    /// Repeats the pattern `times` times; requires `times > 0`.
    fn mul(self, times: usize) -> Pattern {
        assert!(times > 0, "Pattern repeat count must be > 0");
        let mut events = Vec::with_capacity(self.events.len() * times);
        for _ in 0..times {
            events.extend(self.events.iter().cloned());
        }
        Pattern {
            name: self.name,
            events,
            length_bars: self.length_bars * (times as i64),
        }
    }
}

/// Applies a filter to a pattern: `p | f` means "apply `f` to `p`",
/// composing left to right (`p | f | g == g(f(p))`).
impl<F> std::ops::BitOr<F> for Pattern
where
    F: FnOnce(Pattern) -> Pattern,
{
    type Output = Pattern;
    fn bitor(self, f: F) -> Pattern {
        f(self)
    }
}

pub fn zero_length_pattern(name: impl Into<String>) -> Pattern {
    Pattern::empty(name, ZERO)
}
