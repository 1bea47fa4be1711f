//! The melodic mini-notation compiler.
//!
//! Turns a bracketed, whitespace-separated notation string into a flat
//! [`Event`] timeline. The pipeline, in order:
//!
//! 1. [`separate_delimiters`] splits whitespace-delimited tokens so that
//!    every `[`, `]`, `<`, `>` is its own token, expanding the `;`/`:`/`@`
//!    repeat sugar as it goes.
//! 2. [`build_children`] consumes that flat token stream into a nested
//!    `Group`/`Alternation` tree.
//! 3. [`expand_alternations`] rewrites every direct `Alternation` child of
//!    the root into an anchor-interleaved sequence, so only groups and
//!    bare atoms remain.
//! 4. [`transform`] walks the tree, subdividing `length_bars` evenly among
//!    each level's children and emitting one [`Event`] per leaf.
//!
//! Grounded throughout in `pat.py`'s `_get_groups`/`_get_subgroups_r`/
//! `_expand_group_alternations`/`_transform` pipeline.

use crate::duration::{Duration, BAR, HALF};
use crate::error::CompileError;
use crate::model::{Event, Pattern};
use crate::names::random_name;
use std::collections::VecDeque;

const DEFAULT_OCTAVE: i32 = 3;
const DEFAULT_NOTE: i32 = 60;

fn pitch_class(c: char) -> Option<i32> {
    match c {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

fn is_velocity_token(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// `round((ord(c) - 96) / 26, 2)`, the velocity a lowercase letter names.
fn velocity_value(c: char) -> f64 {
    let i = (c as i32) - 96;
    (((i as f64) / 26.0) * 100.0).round() / 100.0
}

fn default_velocity() -> f64 {
    velocity_value('o')
}

fn note_num(pc: i32, octave: i32) -> i32 {
    pc + (octave + 2) * 12
}

/// One node of the pre-expansion parse tree.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Atom(String),
    Group(Vec<Node>),
    Alternation(Vec<Node>),
}

/// Sugar expansion for a single already-whitespace-split token: `x;n`
/// wraps `n` copies in a fresh group, `x:n` repeats inline, `x@n` ties `x`
/// across `n` slots. Requires `n` to parse as an integer `> 1`.
fn expand(atom: &str) -> Result<Vec<String>, CompileError> {
    if atom.contains(';') {
        let pieces: Vec<&str> = atom.split(';').collect();
        if pieces.len() != 2 {
            return Err(CompileError::with_context(format!(
                "malformed repeat sugar: {atom}"
            )));
        }
        let n = parse_sugar_count(pieces[1], atom)?;
        let mut out = vec!["[".to_string()];
        out.extend(std::iter::repeat(pieces[0].to_string()).take(n));
        out.push("]".to_string());
        return Ok(out);
    }
    if atom.contains(':') {
        let pieces: Vec<&str> = atom.split(':').collect();
        if pieces.len() != 2 {
            return Err(CompileError::with_context(format!(
                "malformed repeat sugar: {atom}"
            )));
        }
        let n = parse_sugar_count(pieces[1], atom)?;
        return Ok(std::iter::repeat(pieces[0].to_string()).take(n).collect());
    }
    if atom.contains('@') {
        let pieces: Vec<&str> = atom.split('@').collect();
        if pieces.len() != 2 {
            return Err(CompileError::with_context(format!(
                "malformed tie sugar: {atom}"
            )));
        }
        let n = parse_sugar_count(pieces[1], atom)?;
        let mut out = vec![pieces[0].to_string()];
        out.extend(std::iter::repeat("_".to_string()).take(n - 1));
        return Ok(out);
    }
    Ok(vec![atom.to_string()])
}

fn parse_sugar_count(raw: &str, atom: &str) -> Result<usize, CompileError> {
    let n: i64 = raw
        .parse()
        .map_err(|_| CompileError::with_context(format!("malformed repeat count: {atom}")))?;
    if n <= 1 {
        return Err(CompileError::with_context(format!(
            "repeat count must be > 1: {atom}"
        )));
    }
    Ok(n as usize)
}

/// Splits whitespace-delimited tokens so every bracket character stands
/// alone, stripping one delimiter character at a time off the ends of a
/// token until only an atom remains, then sugar-expanding that atom.
fn separate_delimiters(tokens: Vec<String>) -> Result<Vec<String>, CompileError> {
    let mut work: VecDeque<String> = tokens.into();
    let mut out = Vec::new();
    while let Some(raw) = work.pop_front() {
        let tok = raw.trim().to_string();
        if tok.is_empty() {
            return Err(CompileError::InvalidSyntax);
        }
        if tok.chars().count() == 1 {
            out.extend(expand(&tok)?);
            continue;
        }
        let chars: Vec<char> = tok.chars().collect();
        if chars[0] == '[' {
            out.push("[".to_string());
            work.push_front(chars[1..].iter().collect());
            continue;
        }
        if *chars.last().unwrap() == ']' {
            let head: String = chars[..chars.len() - 1].iter().collect();
            work.push_front("]".to_string());
            work.push_front(head);
            continue;
        }
        if chars[0] == '<' {
            out.push("<".to_string());
            work.push_front(chars[1..].iter().collect());
            continue;
        }
        if *chars.last().unwrap() == '>' {
            let head: String = chars[..chars.len() - 1].iter().collect();
            work.push_front(">".to_string());
            work.push_front(head);
            continue;
        }
        out.extend(expand(&tok)?);
    }
    Ok(out)
}

fn is_empty_pattern_token(tok: &str) -> bool {
    let trimmed: String = tok.chars().filter(|c| !c.is_whitespace()).collect();
    trimmed == "[]"
}

/// Consumes a flat, already-separated token stream into a tree. `[`/`<`
/// open a nested group/alternation that recurses until its matching
/// `]`/`>`; a lone token matching the whole-pattern-empty shape (`[]`, with
/// or without internal whitespace) is dropped rather than becoming a node,
/// mirroring `_get_subgroups_r`'s defensive (and, through the real
/// tokenizer, unreachable) empty-pattern branch.
fn build_children(tokens: &[String], pos: &mut usize) -> Vec<Node> {
    let mut children = Vec::new();
    while *pos < tokens.len() {
        let tok = tokens[*pos].as_str();
        match tok {
            "[" => {
                *pos += 1;
                let sub = build_children(tokens, pos);
                children.push(Node::Group(sub));
            }
            "]" => {
                *pos += 1;
                return children;
            }
            "<" => {
                *pos += 1;
                let sub = build_children(tokens, pos);
                children.push(Node::Alternation(sub));
            }
            ">" => {
                *pos += 1;
                return children;
            }
            _ if is_empty_pattern_token(tok) => {
                *pos += 1;
            }
            _ => {
                children.push(Node::Atom(tokens[*pos].clone()));
                *pos += 1;
            }
        }
    }
    children
}

/// Rewrites every direct `Alternation` child of a group's children into an
/// anchor-interleaved sequence: `[A <B C>]` becomes `[A B A C]`. A nested
/// `Alternation` inside the replaced alternation's own children is expanded
/// first (`<A <B C> D>` has an anchor of its own), but a nested
/// `Alternation` sitting inside a *sibling group* is left untouched — the
/// original only ever expands one level, at the root, and a `Group` child
/// is passed through unexamined here too, so `[A [B <C D>]]` keeps an
/// unexpanded alternation buried in the inner group. This matches
/// `_expand_group_alternations`/`_expand_sub_alternations` exactly, bug for
/// bug: neither function recurses into a `Group` child to expand
/// alternations nested inside it.
fn expand_alternations(children: Vec<Node>) -> Result<Vec<Node>, CompileError> {
    let mut new_children: Vec<Node> = Vec::new();
    let mut idx = 0;
    while idx < children.len() {
        let Node::Alternation(alt_children) = &children[idx] else {
            new_children.push(children[idx].clone());
            idx += 1;
            continue;
        };
        if idx == 0 {
            return Err(CompileError::with_context(
                "alternation must have an anchor",
            ));
        }
        let expanded_alt = expand_alternations(alt_children.clone())?;
        new_children.pop();
        let anchor = children[idx - 1].clone();
        for child_a in expanded_alt {
            new_children.push(anchor.clone());
            new_children.push(child_a);
        }
        idx += 1;
    }
    Ok(new_children)
}

fn parse_note(event_str: &str, dur: Duration) -> Result<Event, CompileError> {
    let chars: Vec<char> = event_str.chars().collect();
    let bad = || CompileError::with_context(format!("invalid note: {event_str}"));
    match chars.len() {
        1 => {
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            Ok(Event::note(
                note_num(pc, DEFAULT_OCTAVE),
                default_velocity(),
                HALF,
                dur,
            ))
        }
        2 if chars[1] == '\'' => {
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            Ok(Event::note(
                note_num(pc + 1, DEFAULT_OCTAVE),
                default_velocity(),
                HALF,
                dur,
            ))
        }
        2 if is_velocity_token(chars[1]) => {
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            Ok(Event::note(
                note_num(pc, DEFAULT_OCTAVE),
                velocity_value(chars[1]),
                HALF,
                dur,
            ))
        }
        2 => {
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            let octave = chars[1].to_digit(10).ok_or_else(bad)? as i32;
            Ok(Event::note(note_num(pc, octave), default_velocity(), HALF, dur))
        }
        3 if chars[1] == '\'' && is_velocity_token(chars[2]) => {
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            Ok(Event::note(
                note_num(pc + 1, DEFAULT_OCTAVE),
                velocity_value(chars[2]),
                HALF,
                dur,
            ))
        }
        3 if chars[1] == '\'' => {
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            let octave = chars[2].to_digit(10).ok_or_else(bad)? as i32;
            Ok(Event::note(
                note_num(pc + 1, octave),
                default_velocity(),
                HALF,
                dur,
            ))
        }
        3 => {
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            let octave = chars[1].to_digit(10).ok_or_else(bad)? as i32;
            Ok(Event::note(
                note_num(pc, octave),
                velocity_value(chars[2]),
                HALF,
                dur,
            ))
        }
        4 => {
            if chars[1] != '\'' {
                return Err(CompileError::with_context(format!(
                    "expected {} to equal ' (single quote)",
                    chars[1]
                )));
            }
            let pc = pitch_class(chars[0]).ok_or_else(bad)?;
            let octave = chars[2].to_digit(10).ok_or_else(bad)? as i32;
            Ok(Event::note(
                note_num(pc + 1, octave),
                velocity_value(chars[3]),
                HALF,
                dur,
            ))
        }
        _ => Err(bad()),
    }
}

fn parse(event_str: &str, dur: Duration) -> Result<Vec<Event>, CompileError> {
    let s = event_str.trim();
    if s.is_empty() {
        return Ok(vec![]);
    }
    let first = s.chars().next().unwrap();
    if pitch_class(first).is_some() {
        return Ok(vec![parse_note(s, dur)?]);
    }
    if s == "." {
        return Ok(vec![Event::rest(dur)]);
    }
    if !is_velocity_token(first) {
        return Err(CompileError::with_context(format!(
            "unsupported token: {s}"
        )));
    }
    Ok(vec![Event::note(DEFAULT_NOTE, velocity_value(first), HALF, dur)])
}

/// Subdivides `length_bars` evenly across `node`'s children and emits one
/// event per leaf, recursing into nested groups with the subdivided
/// duration. A bare `_` ties onto the previously emitted event in the
/// current child list by extending its slot duration, rather than emitting
/// a new event.
fn transform(node: &Node, length_bars: Duration) -> Result<Vec<Event>, CompileError> {
    let children = match node {
        Node::Group(c) => c,
        _ => return Err(CompileError::InvalidSyntax),
    };
    if children.is_empty() {
        return Ok(vec![]);
    }
    let each_dur = length_bars / (children.len() as i64);
    let mut events: Vec<Event> = Vec::new();
    for child in children {
        match child {
            Node::Group(_) => {
                events.extend(transform(child, each_dur)?);
            }
            Node::Alternation(_) => return Err(CompileError::InvalidSyntax),
            Node::Atom(s) if s == "_" => {
                let last = events
                    .last_mut()
                    .ok_or_else(|| CompileError::with_context("tie with no preceding event"))?;
                last.extend_slot(each_dur);
            }
            Node::Atom(s) => {
                events.extend(parse(s, each_dur)?);
            }
        }
    }
    Ok(events)
}

/// Parses `definition` into a fully expanded group tree, ready for
/// [`transform`].
fn get_groups(definition: &str) -> Result<Node, CompileError> {
    if is_empty_pattern_token(definition) {
        return Ok(Node::Group(vec![]));
    }
    let trimmed = definition.trim();
    if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
        return Err(CompileError::with_context(format!(
            "pattern must be wrapped in [ ]: {definition}"
        )));
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    let tokens: Vec<String> = inner.split_whitespace().map(|s| s.to_string()).collect();
    let separated = separate_delimiters(tokens)?;
    let mut pos = 0;
    let root_children = build_children(&separated, &mut pos);
    let expanded = expand_alternations(root_children)?;
    Ok(Node::Group(expanded))
}

/// Compiles `definition` against a timeline of `length_bars`, returning
/// the flat event list without wrapping it in a named [`Pattern`].
pub fn compile(definition: &str, length_bars: Duration) -> Result<Vec<Event>, CompileError> {
    let tree = get_groups(definition)?;
    transform(&tree, length_bars)
}

/// Compiles `definition` into a one-bar-long, randomly-named [`Pattern`].
pub fn pat(definition: &str) -> Result<Pattern, CompileError> {
    let events = compile(definition, BAR)?;
    Ok(Pattern {
        name: random_name(),
        events,
        length_bars: BAR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration as D;
    use crate::model::Action;

    fn note_of(ev: &Event) -> &crate::model::Note {
        ev.action.as_note().expect("expected a note event")
    }

    #[test]
    fn separate_delimiters_splits_brackets() {
        let out = separate_delimiters(vec!["[]".to_string()]).unwrap();
        assert_eq!(out, vec!["[".to_string(), "]".to_string()]);

        let out = separate_delimiters(vec!["[C".to_string(), "E".to_string(), "G]".to_string()])
            .unwrap();
        assert_eq!(
            out,
            vec!["[", "C", "E", "G", "]"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_pattern_compiles_to_no_events() {
        let events = compile("[]", BAR).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn single_opening_bracket_is_invalid_syntax() {
        let err = compile("[", BAR).unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidSyntaxWithContext(_) | CompileError::InvalidSyntax
        ));
    }

    #[test]
    fn one_note_defaults_to_octave_three_and_half_dur() {
        let events = compile("[C]", BAR).unwrap();
        assert_eq!(events.len(), 1);
        let note = note_of(&events[0]);
        assert_eq!(note.note_num, 60);
        assert_eq!(note.velocity, default_velocity());
        assert_eq!(note.dur, HALF);
        assert_eq!(events[0].dur, BAR);
    }

    #[test]
    fn three_notes_divide_the_bar_evenly() {
        let events = compile("[C E G]", BAR).unwrap();
        assert_eq!(events.len(), 3);
        for ev in &events {
            assert_eq!(ev.dur, BAR / 3);
        }
        assert_eq!(note_of(&events[0]).note_num, 60);
        assert_eq!(note_of(&events[1]).note_num, 64);
        assert_eq!(note_of(&events[2]).note_num, 67);
    }

    #[test]
    fn nested_groups_subdivide_recursively() {
        let events = compile("[C [E G]]", BAR).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].dur, HALF);
        assert_eq!(events[1].dur, D::new(1, 4));
        assert_eq!(events[2].dur, D::new(1, 4));
    }

    #[test]
    fn pitch_class_with_octave_digit() {
        let events = compile("[C1]", BAR).unwrap();
        assert_eq!(note_of(&events[0]).note_num, 36);
    }

    #[test]
    fn sharp_pitch_class_with_octave() {
        let events = compile("[C'1]", BAR).unwrap();
        assert_eq!(note_of(&events[0]).note_num, 37);
    }

    #[test]
    fn sharp_octave_and_velocity() {
        let events = compile("[C'1w]", BAR).unwrap();
        let note = note_of(&events[0]);
        assert_eq!(note.note_num, 37);
        assert_eq!(note.velocity, velocity_value('w'));
    }

    #[test]
    fn rests_and_grouped_repeat_sugar() {
        let events = compile("[y .;2]", BAR).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].dur, HALF);
        assert!(matches!(events[1].action, Action::Rest));
        assert_eq!(events[1].dur, D::new(1, 4));
        assert_eq!(events[2].dur, D::new(1, 4));
    }

    #[test]
    fn inline_repeat_sugar_divides_without_grouping() {
        let events = compile("[y .:2]", BAR).unwrap();
        assert_eq!(events.len(), 3);
        for ev in &events {
            assert_eq!(ev.dur, BAR / 3);
        }
    }

    #[test]
    fn ties_extend_the_preceding_slot() {
        let events = compile("[Cy _:3 Gw _]", BAR).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].dur, (BAR / 3) * 2);
        assert_eq!(events[1].dur, BAR / 3);
    }

    #[test]
    fn tie_sugar_matches_explicit_ties() {
        let events = compile("[Cy@4 Gw _]", BAR).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].dur, (BAR / 3) * 2);
        assert_eq!(events[1].dur, BAR / 3);
    }

    #[test]
    fn alternation_interleaves_with_its_anchor() {
        let events = compile("[Cy <Gw Ex>]", BAR).unwrap();
        assert_eq!(events.len(), 4);
        for ev in &events {
            assert_eq!(ev.dur, D::new(1, 4));
        }
        assert_eq!(note_of(&events[0]).note_num, 60);
        assert_eq!(note_of(&events[1]).note_num, 67);
        assert_eq!(note_of(&events[2]).note_num, 60);
        assert_eq!(note_of(&events[3]).note_num, 64);
    }

    #[test]
    fn nested_alternation_expands_recursively() {
        let events = compile("[Cy <Gw Ex <Fd Ap>>]", BAR).unwrap();
        assert_eq!(events.len(), 10);
        for ev in &events {
            assert_eq!(ev.dur, D::new(1, 10));
        }
    }

    #[test]
    fn alternation_without_anchor_is_invalid() {
        let err = compile("[<A B> C]", BAR).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSyntaxWithContext(_)));
    }

    #[test]
    fn tie_with_no_preceding_event_is_invalid() {
        let err = compile("[_]", BAR).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSyntaxWithContext(_)));
    }
}
