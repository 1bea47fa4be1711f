//! # Crispy
//!
//! Crispy compiles compact textual pattern descriptions for live musical
//! performance into a canonical timeline of timed events for dispatch to
//! an external audio/MIDI plugin. Two surface notations compile down to
//! the same intermediate form:
//!
//! - a nested, bracketed **melodic** mini-notation ([`mini_notation`]),
//!   Tidal-cycles-inspired, with groups, alternation, ties, and repeat
//!   sugar;
//! - a linear, one-lane-per-line **percussion** notation ([`percussion`]).
//!
//! Both emit an ordered sequence of [`model::Event`]s whose exact
//! rational [`duration::Duration`]s sum to the pattern's declared length.
//! A library of pure [`combinators`] (reverse, rotate, transpose, clip,
//! concatenate, resize, every-Nth, map-each) reshapes a compiled
//! [`model::Pattern`] into another one.
//!
//! ## Quick start
//!
//! ```rust
//! use crispy::mini_notation::pat;
//! use crispy::combinators::{tran, rev};
//!
//! let pattern = pat("[C [E G] C2]").unwrap();
//! let transposed = pattern | tran(7) | rev;
//! assert_eq!(transposed.events.len(), 3);
//! ```
//!
//! ## Percussion
//!
//! ```rust
//! use crispy::percussion::parse;
//!
//! let lanes = parse("c1 = X++x.\nd1 = ..X.").unwrap();
//! assert_eq!(lanes.len(), 2);
//! ```
//!
//! ## Pipeline, not a mutable sequencer
//!
//! There is no scheduler, clock, or network listener in this crate —
//! compiling and transforming a [`model::Pattern`] is a pure function
//! from text to a timeline value. Dispatching that value to a real
//! plugin ([`dispatch`]) and driving it from a command line (the
//! `crispy` binary, `src/main.rs`) are thin, separately-optional shells
//! around this core.

pub mod combinators;
pub mod ctrl;
#[cfg(feature = "dispatch")]
pub mod dispatch;
pub mod duration;
pub mod error;
pub mod mini_notation;
pub mod model;
pub mod names;
pub mod notes;
pub mod percussion;
pub mod pitch;
pub mod scales;
pub mod serialization;
