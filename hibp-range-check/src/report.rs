//! Turns lookup results into what the user sees.
//!
//! A failed lookup never fails the run: it is reported as unknown and counted as
//! not breached, since the range API being down says nothing about the password.

use std::fmt;

use hibp_range::{CheckResult, Error, PREFIX_LEN};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Breached { count: u64 },
    NotFound,
    /// The lookup failed; treated as not found.
    Unknown { reason: String },
    /// The input was not a valid hash.
    Invalid { reason: String },
}

impl Outcome {
    pub fn is_breached(&self) -> bool {
        matches!(self, Outcome::Breached { .. })
    }
}

/// Applies the degradation policy to one lookup.
pub fn assess(label: &str, result: Result<CheckResult, Error>) -> Outcome {
    match result {
        Ok(CheckResult { breached: true, count }) => Outcome::Breached { count },
        Ok(_) => Outcome::NotFound,
        Err(err @ Error::Format { .. }) => Outcome::Invalid { reason: err.to_string() },
        Err(err) => {
            warn!(input = label, error = %err, "breach lookup unavailable, treating as not found");
            Outcome::Unknown { reason: err.to_string() }
        }
    }
}

/// One output line. Never carries the password or the withheld part of a hash.
#[derive(Debug, Serialize)]
pub struct Report {
    pub label: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Report {
    pub fn new(label: String, outcome: Outcome) -> Self {
        Self { label, outcome }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.label)?;
        match &self.outcome {
            Outcome::Breached { count } => write!(f, "BREACHED (seen {count} times)"),
            Outcome::NotFound => write!(f, "not found"),
            Outcome::Unknown { reason } => write!(f, "unknown, lookup failed ({reason})"),
            Outcome::Invalid { reason } => write!(f, "invalid input ({reason})"),
        }
    }
}

/// Label for a password input: its position only.
pub fn password_label(index: usize) -> String {
    format!("#{}", index + 1)
}

/// Label for a hash input: its position and disclosed prefix.
pub fn hash_label(index: usize, hash: &str) -> String {
    let trimmed = hash.trim();
    match trimmed.get(..PREFIX_LEN) {
        Some(prefix) if trimmed.len() > PREFIX_LEN => {
            format!("#{} {}…", index + 1, prefix.to_ascii_lowercase())
        }
        _ => password_label(index),
    }
}
