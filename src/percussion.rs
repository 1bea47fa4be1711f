//! The linear percussion notation compiler.
//!
//! Each non-blank line of a percussion definition has the shape
//! `NOTE = tokens`, where `NOTE` resolves to a MIDI number via
//! [`crate::notes::note_number`] and `tokens` is scanned one character at
//! a time: `X`/`x` emit a loud/quiet note, `.` emits a rest, and `+` ties
//! onto the previously emitted event by extending its slot duration — it
//! never emits an event of its own. Every emitted slot is one sixteenth
//! note wide before any tying happens.
//!
//! Grounded in `crispy/perc.py`'s `Perc.parse`/`parse_line`/`parse_event`.

use crate::duration::{HALF, SIXTEENTH, ZERO};
use crate::error::PercError;
use crate::model::{Event, Pattern};
use crate::notes::note_number;

/// Compiles one `NOTE = tokens` line into a named [`Pattern`].
fn parse_line(line: &str) -> Result<Pattern, PercError> {
    let mut parts = line.splitn(2, '=');
    let note_str = parts.next().unwrap_or("").trim();
    let events_str = match parts.next() {
        Some(rest) => rest,
        None => return Err(PercError::malformed_line()),
    };
    if line.matches('=').count() != 1 {
        return Err(PercError::malformed_line());
    }

    let note_num = note_number(note_str).ok_or_else(PercError::malformed_line)?;

    let events_str = events_str.trim();
    if events_str.is_empty() {
        return Ok(Pattern::empty(note_str, ZERO));
    }

    let mut events: Vec<Event> = Vec::new();
    for ch in events_str.chars().filter(|c| !c.is_whitespace()) {
        match ch {
            '.' => events.push(Event::rest(SIXTEENTH)),
            'X' => events.push(Event::note(note_num, 0.9, HALF, SIXTEENTH)),
            'x' => events.push(Event::note(note_num, 0.4, HALF, SIXTEENTH)),
            '+' => {
                let last = events
                    .last_mut()
                    .expect("no event to tie");
                last.extend_slot(SIXTEENTH);
            }
            other => return Err(PercError::unsupported(other)),
        }
    }

    let length_bars = events.iter().map(|e| e.dur).sum();
    Ok(Pattern {
        name: note_str.to_string(),
        events,
        length_bars,
    })
}

/// Compiles a multi-line percussion definition into one [`Pattern`] per
/// non-blank line, in source order.
pub fn parse(definition: &str) -> Result<Vec<Pattern>, PercError> {
    definition
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}
