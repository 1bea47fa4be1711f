//! Crispy CLI - compile pattern definitions read from stdin and either
//! print their dispatch envelope or POST them straight to the external
//! audio/MIDI plugin.
//!
//! Mirrors `crispy/__main__.py`'s three commands: `pat` reads `NAME =
//! definition` lines (one melodic pattern per line, skipping any that
//! compile to zero events), `perc` reads a whole multi-line percussion
//! definition and dispatches every lane, and `silence` stops one named
//! pattern or, with `--notes`, every name [`crispy::notes::known_names`]
//! recognizes.

use clap::{Parser, Subcommand};
use crispy::combinators::name;
use crispy::mini_notation;
use crispy::model::Pattern;
use crispy::notes::known_names;
use crispy::percussion;
use crispy::serialization::{envelope_to_json, pattern_to_json};
use std::io::Read;

#[derive(Parser)]
#[command(name = "crispy")]
#[command(about = "Compiles mini-notation pattern text into timed event timelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reads `NAME = definition` lines from stdin, one melodic pattern
    /// per line, and dispatches each (patterns with no events are
    /// skipped).
    Pat {
        /// MIDI channel (1-16) to tag every dispatch envelope with.
        #[arg(short, long, default_value_t = 1)]
        channel: u8,

        /// Print each pattern's full canonical form (name, events,
        /// length_bars) instead of its dispatch envelope.
        #[arg(long)]
        full: bool,

        /// POST each pattern to the external plugin instead of printing
        /// it. Requires the `dispatch` feature.
        #[arg(long)]
        dispatch: bool,

        /// Base URL of the external plugin.
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        endpoint: String,
    },

    /// Reads a whole percussion definition (one `NOTE = tokens` lane per
    /// line) from stdin and dispatches every lane.
    Perc {
        /// MIDI channel (1-16) to tag every lane's dispatch envelope
        /// with.
        #[arg(short, long, default_value_t = 1)]
        channel: u8,

        /// Print each lane's full canonical form instead of its
        /// dispatch envelope.
        #[arg(long)]
        full: bool,

        /// POST each lane to the external plugin instead of printing
        /// it. Requires the `dispatch` feature.
        #[arg(long)]
        dispatch: bool,

        /// Base URL of the external plugin.
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        endpoint: String,
    },

    /// Stops a named pattern, or every name `--notes` recognizes.
    Silence {
        /// The pattern name to stop. Required unless `--notes` is given.
        #[arg(long)]
        name: Option<String>,

        /// Stop every name crispy's note-name table recognizes instead
        /// of a single named pattern.
        #[arg(long)]
        notes: bool,

        /// Base URL of the external plugin.
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        endpoint: String,
    },
}

fn read_stdin() -> Result<String, Box<dyn std::error::Error>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

/// Parses one `NAME = definition` line into a named, one-bar [`Pattern`].
/// Returns `Ok(None)` for a blank line.
fn parse_melody_line(line: &str) -> Result<Option<Pattern>, Box<dyn std::error::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (lane_name, definition) = line
        .split_once('=')
        .ok_or("expected a line of the form NAME = definition")?;
    let pattern = mini_notation::pat(definition.trim())? | name(lane_name.trim().to_string());
    Ok(Some(pattern))
}

fn emit_or_dispatch(
    pattern: &Pattern,
    channel: u8,
    full: bool,
    dispatch: bool,
    endpoint: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if dispatch {
        return do_dispatch(pattern, channel, endpoint);
    }
    if full {
        println!("{}", pattern_to_json(pattern));
    } else {
        println!("{}", envelope_to_json(pattern, channel));
    }
    Ok(())
}

#[cfg(feature = "dispatch")]
fn do_dispatch(
    pattern: &Pattern,
    channel: u8,
    endpoint: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = crispy::dispatch::DispatchClient::new(endpoint);
    client.play(pattern, Some(channel))?;
    tracing::info!(name = %pattern.name, channel, "dispatched pattern");
    Ok(())
}

#[cfg(not(feature = "dispatch"))]
fn do_dispatch(
    _pattern: &Pattern,
    _channel: u8,
    _endpoint: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    Err("this binary was built without the `dispatch` feature".into())
}

#[cfg(feature = "dispatch")]
fn do_stop(pattern_name: &str, endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = crispy::dispatch::DispatchClient::new(endpoint);
    client.stop(pattern_name)?;
    tracing::info!(name = pattern_name, "stopped pattern");
    Ok(())
}

#[cfg(not(feature = "dispatch"))]
fn do_stop(pattern_name: &str, _endpoint: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{{\"stop\":\"{pattern_name}\"}}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pat {
            channel,
            full,
            dispatch,
            endpoint,
        } => {
            let input = read_stdin()?;
            for line in input.lines() {
                let Some(pattern) = parse_melody_line(line)? else {
                    continue;
                };
                if pattern.events.is_empty() {
                    continue;
                }
                emit_or_dispatch(&pattern, channel, full, dispatch, &endpoint)?;
            }
        }

        Commands::Perc {
            channel,
            full,
            dispatch,
            endpoint,
        } => {
            let input = read_stdin()?;
            let lanes = percussion::parse(&input)?;
            for lane in &lanes {
                emit_or_dispatch(lane, channel, full, dispatch, &endpoint)?;
            }
        }

        Commands::Silence {
            name,
            notes,
            endpoint,
        } => {
            if !notes && name.as_deref().map_or(true, str::is_empty) {
                return Err("silence requires --name NAME or --notes".into());
            }
            if notes {
                for pattern_name in known_names() {
                    do_stop(&pattern_name, &endpoint)?;
                }
            } else if let Some(pattern_name) = name {
                do_stop(&pattern_name, &endpoint)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_melody_line() {
        let pattern = parse_melody_line("kick = [C E G]").unwrap().unwrap();
        assert_eq!(pattern.name, "kick");
        assert_eq!(pattern.events.len(), 3);
    }

    #[test]
    fn blank_line_yields_none() {
        assert!(parse_melody_line("   ").unwrap().is_none());
    }

    #[test]
    fn empty_pattern_produces_no_events() {
        let pattern = parse_melody_line("silent = []").unwrap().unwrap();
        assert!(pattern.events.is_empty());
    }

    #[test]
    fn missing_equals_is_an_error() {
        assert!(parse_melody_line("[C E G]").is_err());
    }
}
