//! # Drive script input
//!
//! Drive scripts give the held input state at points in simulated time,
//! allowing the vehicle to be driven without a keyboard. Each entry is
//! written as
//!
//! ```text
//! <time_s>: <token> [<token>...];
//! ```
//!
//! where the tokens are `forward`, `backward`, `left`, `right`, `none` and
//! `stop`. An entry's state is held until the next entry. `stop` ends the
//! simulation. Lines that do not start with a timestamp are ignored, so `#`
//! can be used for comments.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use super::{InputError, InputReport, InputSource, Lateral, Longitudinal};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Tolerance on entry times, absorbs rounding in the accumulated sim time.
const TIME_TOLERANCE_S: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An input state which is scripted to start at a specific time.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Entry {
    /// The time the state starts at
    exec_time_s: f64,

    report: InputReport,
}

/// A drive script input source.
pub struct ScriptInput {
    entries: VecDeque<Entry>,
    current: InputReport,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Could not build the script parser: {0}")]
    ParserError(regex::Error),

    #[error("Script entry at {0} s is earlier than the entry before it")]
    NonMonotonicTimestamp(f64),

    #[error("Script entry at {0} s contains an unknown token \"{1}\"")]
    UnknownToken(f64, String),

    #[error("Script entry at {0} s demands opposing directions")]
    ConflictingTokens(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInput {

    /// Load a drive script from the given path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        Self::parse(&script)
    }

    /// Parse a drive script held in a string.
    pub fn parse(script: &str) -> Result<Self, ScriptError> {

        let mut entries: VecDeque<Entry> = VecDeque::new();

        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::ParserError)?;

        for cap in re.captures_iter(script) {
            let time_str = cap.get(1).map_or("", |m| m.as_str());
            let exec_time_s: f64 = time_str.parse()
                .map_err(|_| ScriptError::InvalidTimestamp(time_str.to_string()))?;

            if let Some(prev) = entries.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::NonMonotonicTimestamp(exec_time_s));
                }
            }

            let report = parse_tokens(exec_time_s, cap.get(3).map_or("", |m| m.as_str()))?;

            entries.push_back(Entry {
                exec_time_s,
                report
            });
        }

        if entries.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInput {
            entries,
            current: InputReport::default()
        })
    }

    /// Get the number of entries left in the script
    pub fn get_num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.entries.back() {
            Some(e) => e.exec_time_s,
            None => 0f64
        }
    }
}

impl InputSource for ScriptInput {
    fn poll(&mut self, sim_time_s: f64) -> Result<InputReport, InputError> {

        // Move through every entry which has started by now, the latest one
        // becomes the held state.
        while let Some(entry) = self.entries.front().copied() {
            if entry.exec_time_s > sim_time_s + TIME_TOLERANCE_S {
                break;
            }

            debug!("Script entry at {} s: {:?}", entry.exec_time_s, entry.report);

            self.current = entry.report;
            self.entries.pop_front();

            if self.current.terminate {
                break;
            }
        }

        Ok(self.current)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse the whitespace separated tokens of an entry.
fn parse_tokens(exec_time_s: f64, payload: &str) -> Result<InputReport, ScriptError> {
    let (mut forward, mut backward, mut left, mut right) = (false, false, false, false);
    let mut terminate = false;

    for token in payload.split_whitespace() {
        match token.to_lowercase().as_str() {
            "forward" => forward = true,
            "backward" => backward = true,
            "left" => left = true,
            "right" => right = true,
            "none" => (),
            "stop" => terminate = true,
            _ => return Err(ScriptError::UnknownToken(exec_time_s, token.to_string()))
        }
    }

    if (forward && backward) || (left && right) {
        return Err(ScriptError::ConflictingTokens(exec_time_s));
    }

    Ok(InputReport {
        longitudinal: Longitudinal::from_held(forward, backward),
        lateral: Lateral::from_held(left, right),
        terminate
    })
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
