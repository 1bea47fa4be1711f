//! Typed errors for the two pattern compilers.
//!
//! Arithmetic and combinator preconditions (zero denominators, `lclip`
//! overrun, `revery`/`levery` with `n <= 1`) stay `panic!`/`assert!`-style
//! programmer errors — they indicate a bug in the caller, not malformed
//! user input, and the original Python source treats them identically
//! (bare `assert`s, not exceptions a caller is expected to catch).

use thiserror::Error;

/// The single exception kind the melodic parser raises.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("invalid syntax")]
    InvalidSyntax,

    #[error("invalid syntax: {0}")]
    InvalidSyntaxWithContext(String),
}

impl CompileError {
    pub fn with_context(context: impl Into<String>) -> Self {
        CompileError::InvalidSyntaxWithContext(context.into())
    }
}

/// The percussion compiler's error, naming the offending character (or
/// malformed line) and echoing the accepted line format. The usage string
/// is deliberately `"NOTE = [Xx_.]"` even though the real tie character is
/// `+`, not `_` — the original source's own (slightly wrong) usage text,
/// reproduced verbatim rather than corrected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PercError {
    #[error("unsupported notation: {ch} (line format is {usage})")]
    UnsupportedNotation { ch: char, usage: &'static str },

    #[error("malformed line, expected `NOTE = events` (line format is {usage})")]
    MalformedLine { usage: &'static str },
}

const PERC_USAGE: &str = "NOTE = [Xx_.]";

impl PercError {
    pub fn unsupported(ch: char) -> Self {
        PercError::UnsupportedNotation {
            ch,
            usage: PERC_USAGE,
        }
    }

    pub fn malformed_line() -> Self {
        PercError::MalformedLine {
            usage: PERC_USAGE,
        }
    }
}
