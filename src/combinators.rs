//! Pure pattern combinators.
//!
//! Each combinator is a constructor that closes over its arguments and
//! returns a `FnOnce(Pattern) -> Pattern`, so it composes with the pipe
//! operator on [`Pattern`]: `pattern | tran(7) | rev`. None of these ever
//! mutate their input; every one builds and returns a new `Pattern`.
//!
//! Grounded throughout in `crispy_code/filters.py`.

use crate::duration::{Duration, ZERO};
use crate::model::{Action, Event, Note, Pattern};

/// Reverses event order; slot durations travel with their events.
pub fn rev(pattern: Pattern) -> Pattern {
    let mut events = pattern.events;
    events.reverse();
    Pattern { events, ..pattern }
}

/// Rotates the event list by `n` places. Positive `n` rotates right (the
/// last `n` events move to the front); negative rotates left. Mirrors
/// Python's `deque.rotate`.
pub fn rot(n: i64) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        let len = pattern.events.len();
        if len == 0 {
            return pattern;
        }
        let shift = n.rem_euclid(len as i64) as usize;
        let mut events = Vec::with_capacity(len);
        events.extend_from_slice(&pattern.events[len - shift..]);
        events.extend_from_slice(&pattern.events[..len - shift]);
        Pattern { events, ..pattern }
    }
}

/// Transposes every `Note` event by `amount` semitones (mod 128). `Rest`
/// and `Ctrl` events pass through unchanged.
pub fn tran(amount: i32) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        let events = pattern
            .events
            .into_iter()
            .map(|ev| match ev.action {
                Action::NoteEvent(note) => Event {
                    action: Action::NoteEvent(note.transpose(amount)),
                    dur: ev.dur,
                },
                _ => ev,
            })
            .collect();
        Pattern { events, ..pattern }
    }
}

/// Walks `events` accumulating slot durations until they reach
/// `length_bars`, truncating the event that overshoots to exactly the
/// remainder. If the events run out before reaching `length_bars`, all of
/// them are returned as-is.
fn right_clip(length_bars: Duration, events: &[Event]) -> Vec<Event> {
    let mut running_total = ZERO;
    for (idx, event) in events.iter().enumerate() {
        running_total = running_total + event.dur;
        if running_total == length_bars {
            return events[..=idx].to_vec();
        }
        if running_total > length_bars {
            let remainder = running_total - length_bars;
            let mut out = events[..idx].to_vec();
            out.push(Event {
                action: event.action,
                dur: remainder,
            });
            return out;
        }
    }
    events.to_vec()
}

/// Drops `length_bars` worth of pattern from the left, keeping the tail.
/// Panics if `length_bars` is not strictly less than the pattern's own
/// length — clipping the whole pattern (or more) away is a caller error.
pub fn lclip(length_bars: Duration) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        assert!(
            length_bars < pattern.length_bars,
            "lclip length must be less than the pattern's length"
        );
        let new_length = pattern.length_bars - length_bars;
        let mut reversed = pattern.events;
        reversed.reverse();
        let mut events = right_clip(new_length, &reversed);
        events.reverse();
        Pattern {
            name: pattern.name,
            length_bars: new_length,
            events,
        }
    }
}

/// Drops `length_bars` worth of pattern from the right, keeping the head.
/// Same precondition as [`lclip`].
pub fn rclip(length_bars: Duration) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        assert!(
            length_bars < pattern.length_bars,
            "rclip length must be less than the pattern's length"
        );
        let new_length = pattern.length_bars - length_bars;
        let events = right_clip(new_length, &pattern.events);
        Pattern {
            name: pattern.name,
            length_bars: new_length,
            events,
        }
    }
}

/// Prepends `prefix` to the pattern.
pub fn ladd(prefix: Pattern) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        let mut events = prefix.events;
        events.extend(pattern.events);
        Pattern {
            name: pattern.name,
            length_bars: pattern.length_bars + prefix.length_bars,
            events,
        }
    }
}

/// Appends `suffix` to the pattern.
pub fn radd(suffix: Pattern) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        let mut events = pattern.events;
        events.extend(suffix.events);
        Pattern {
            name: pattern.name,
            length_bars: pattern.length_bars + suffix.length_bars,
            events,
        }
    }
}

/// Scales every event's slot duration (and the overall `length_bars`) by
/// `scalar`. Unlike [`each`], this does not touch a `Note`'s own internal
/// duration — it reconstructs each event from its existing `action`
/// untouched, mirroring `filters.py`'s `resize`, which builds a fresh
/// `Event` directly rather than going through `Event.__mul__`.
pub fn resize(scalar: Duration) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        let events = pattern
            .events
            .into_iter()
            .map(|ev| Event {
                action: ev.action,
                dur: ev.dur * scalar,
            })
            .collect();
        Pattern {
            name: pattern.name,
            length_bars: scalar * pattern.length_bars,
            events,
        }
    }
}

/// Renames the pattern, leaving its events and length untouched.
pub fn name(new_name: impl Into<String>) -> impl FnOnce(Pattern) -> Pattern {
    let new_name = new_name.into();
    move |pattern: Pattern| Pattern {
        name: new_name,
        ..pattern
    }
}

/// `n - 1` plain copies of the pattern followed by one copy with `filt`
/// applied. Requires `n > 1`.
pub fn revery(n: usize, filt: impl Fn(Pattern) -> Pattern) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        assert!(n > 1, "revery requires n > 1");
        let mut result = pattern.clone();
        for _ in 1..n - 1 {
            result = result + pattern.clone();
        }
        result + filt(pattern)
    }
}

/// One copy of the pattern with `filt` applied, followed by `n - 1` plain
/// copies. Requires `n > 1`.
pub fn levery(n: usize, filt: impl Fn(Pattern) -> Pattern) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        assert!(n > 1, "levery requires n > 1");
        let mut result = filt(pattern.clone());
        for _ in 0..n - 1 {
            result = result + pattern.clone();
        }
        result
    }
}

/// Maps `f` over every event, then recomputes `length_bars` as the sum of
/// the mapped events' slot durations. `f` sees (and can change) the whole
/// event, so a closure that scales `ev.dur` moves both the timeline slot
/// and, via [`Event::scale`], a wrapped note's own sounding duration.
pub fn each(f: impl Fn(Event) -> Event) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        let events: Vec<Event> = pattern.events.into_iter().map(f).collect();
        let length_bars = events.iter().map(|e| e.dur).sum();
        Pattern {
            name: pattern.name,
            events,
            length_bars,
        }
    }
}

/// Maps `f` over just the `Note` inside every note event; `Rest` and
/// `Ctrl` events pass through unchanged. `length_bars` is left as-is —
/// `f` only ever sees the note, never the slot duration, so there is
/// nothing here that could change it.
pub fn each_note(f: impl Fn(Note) -> Note) -> impl FnOnce(Pattern) -> Pattern {
    move |pattern: Pattern| {
        let events = pattern
            .events
            .into_iter()
            .map(|ev| match ev.action {
                Action::NoteEvent(note) => Event {
                    action: Action::NoteEvent(f(note)),
                    dur: ev.dur,
                },
                _ => ev,
            })
            .collect();
        Pattern {
            events,
            ..pattern
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{BAR, HALF};
    use crate::mini_notation::pat;

    fn p(def: &str) -> Pattern {
        pat(def).unwrap()
    }

    fn at(def: &str, length_bars: Duration) -> Pattern {
        let events = crate::mini_notation::compile(def, length_bars).unwrap();
        Pattern {
            name: "t".into(),
            events,
            length_bars,
        }
    }

    #[test]
    fn rev_reverses_events() {
        let a = p("[C3 D3 E3 F3 G3]") | rev;
        let b = p("[G3 F3 E3 D3 C3]");
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn tran_shifts_note_num_and_skips_rests() {
        let a = p("[C3 E3 G3]") | tran(7);
        let b = p("[G3 B3 D4]");
        assert_eq!(a.events, b.events);

        let a = p("[C4 . G4]") | tran(12);
        let b = p("[C5 . G5]");
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn rot_right_moves_the_tail_to_the_front() {
        let a = p("[C3 D3 E3 F3 G3]") | rot(1);
        let b = p("[G3 C3 D3 E3 F3]");
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn rot_left_moves_the_head_to_the_back() {
        let a = p("[C3 D3 E3 F3 G3]") | rot(-2);
        let b = p("[E3 F3 G3 C3 D3]");
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn rclip_truncates_overshooting_event() {
        let five_quarters = Duration::new(5, 4);
        let a = at("[C3 D3 E3 F3 G3]", five_quarters) | rclip(BAR / 8);
        let expected = at("[C3 D3 E3 F3]", BAR) + at("[G3]", BAR / 8);
        assert_eq!(a.events, expected.events);
        assert_eq!(a.length_bars, Duration::new(9, 8));
    }

    #[test]
    fn lclip_truncates_from_the_front() {
        let five_quarters = Duration::new(5, 4);
        let a = at("[C3 D3 E3 F3 G3]", five_quarters) | lclip(BAR / 4);
        let b = at("[D3 E3 F3 G3]", BAR);
        assert_eq!(a.events, b.events);
        assert_eq!(a.length_bars, BAR);
    }

    #[test]
    fn ladd_prepends_and_sums_length() {
        let a = p("[C3 D3 E3 G3]") | ladd(p("[C3 D3 E3 G3]") | tran(12));
        let b = at("[C4 D4 E4 G4 C3 D3 E3 G3]", BAR * 2);
        assert_eq!(a.events, b.events);
        assert_eq!(a.length_bars, BAR * 2);
    }

    #[test]
    fn radd_appends_and_sums_length() {
        let a = p("[C3 D3 E3 G3]") | radd(p("[C3 D3 E3 G3]") | tran(12));
        let b = at("[C3 D3 E3 G3 C4 D4 E4 G4]", BAR * 2);
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn resize_scales_slot_duration_only() {
        let a = p("[C3 D3 E3 G3]") | resize(BAR * 3);
        let b = at("[C3 D3 E3 G3]", BAR * 3);
        assert_eq!(a.events, b.events);
        assert_eq!(a.length_bars, BAR * 3);
    }

    #[test]
    fn revery_appends_one_transformed_copy() {
        let a = p("[C3 D3 E3 G3]") | revery(2, rev);
        let b = p("[C3 D3 E3 G3]") + p("[G3 E3 D3 C3]");
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn levery_prepends_one_transformed_copy() {
        let a = p("[C3 D3 E3 G3]") | levery(2, rev);
        let b = p("[G3 E3 D3 C3]") + p("[C3 D3 E3 G3]");
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn each_identity_preserves_pattern() {
        let a = p("[C3 D3 E3 G3]") | each(|e| e);
        let b = p("[C3 D3 E3 G3]");
        assert_eq!(a.events, b.events);
        assert_eq!(a.length_bars, b.length_bars);
    }

    #[test]
    fn each_scaling_duration_touches_note_and_slot() {
        // Slot (1/3) and note dur (the default Half) diverge here on
        // purpose: `scale` must set the note's dur from the *new* slot
        // duration, not from its own prior value.
        let a = p("[C3 D3 G3]") | each(|e| e.scale(Duration::new(2, 1)));
        assert_eq!(a.length_bars, BAR * 2);
        for ev in &a.events {
            assert_eq!(ev.dur, (BAR / 3) * 2);
            assert_eq!(ev.action.as_note().unwrap().dur, (BAR / 3) * 2);
        }
    }

    #[test]
    fn each_note_only_touches_the_note_not_the_slot() {
        let before = p("[C3 G3]");
        let slot_durs: Vec<_> = before.events.iter().map(|e| e.dur).collect();
        let a = before | each_note(|n| n.set_dur(BAR));
        for (ev, orig_slot) in a.events.iter().zip(slot_durs) {
            assert_eq!(ev.dur, orig_slot);
            assert_eq!(ev.action.as_note().unwrap().dur, BAR);
        }
    }
}
