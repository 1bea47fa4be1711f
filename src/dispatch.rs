//! HTTP dispatch to the external audio/MIDI plugin.
//!
//! Behind the `dispatch` feature only — the compiler itself never talks
//! to the network. A [`DispatchClient`] POSTs a pattern's events as JSON
//! to `/start/<name>` and asks the plugin to stop a running pattern via
//! `/stop/<name>`, exactly as `crispy_code/plugin.py`'s `play`/`stop` do.

use crate::model::Pattern;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("request to the plugin failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub struct DispatchClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl Default for DispatchClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl DispatchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Posts `pattern`'s events to `/start/<name>`. `channel`, when given,
    /// must be in `1..=16` — an out-of-range channel is a caller error,
    /// not a dispatch failure, so it panics rather than returning `Err`.
    /// Panics if the pattern's events don't sum to its declared
    /// `length_bars` (a malformed pattern should never reach dispatch).
    pub fn play(&self, pattern: &Pattern, channel: Option<u8>) -> Result<(), DispatchError> {
        assert!(
            pattern.is_well_formed(),
            "pattern events must sum to length_bars before dispatch"
        );
        let envelope = crate::serialization::Envelope::new(pattern, channel.unwrap_or(1));

        self.client
            .post(format!("{}/start/{}", self.base_url, pattern.name))
            .json(&envelope)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    pub fn stop(&self, pattern_name: &str) -> Result<(), DispatchError> {
        self.client
            .post(format!("{}/stop/{}", self.base_url, pattern_name))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

/// A 1-indexed MIDI channel the plugin understands, bound to a
/// [`DispatchClient`]. Mirrors `crispy_code/plugin.py`'s `Channel`/`ch1..ch16`.
pub struct Channel {
    pub number: u8,
}

impl Channel {
    pub fn new(number: u8) -> Self {
        assert!((1..=16).contains(&number), "channel must be in 1..=16");
        Self { number }
    }

    /// Renames `pattern` to `ch<n>` and dispatches it on this channel.
    pub fn play(&self, client: &DispatchClient, pattern: Pattern) -> Result<(), DispatchError> {
        let renamed = pattern | crate::combinators::name(format!("ch{}", self.number));
        client.play(&renamed, Some(self.number))
    }

    pub fn stop(&self, client: &DispatchClient) -> Result<(), DispatchError> {
        client.stop(&format!("ch{}", self.number))
    }
}
