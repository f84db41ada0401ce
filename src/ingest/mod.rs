//! Boundary adapters for league data files.
//!
//! Match and team files are hand-maintained or exported from the hosted
//! database, so fields drift: ids go missing, scores arrive as strings,
//! rosters hold JSON-encoded players. Everything here is lenient. Bad
//! fields are dropped or defaulted and reported as [`Diagnostic`]s; only a
//! file that is not JSON at all is an error.

mod matches;
mod teams;

pub use matches::*;
pub use teams::*;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors that stop a whole file from being read.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid division key {0:?}, expected a number")]
    InvalidDivisionKey(String),
}

/// A recoverable problem found while normalizing a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Score present but not two non-negative integers; treated as absent
    MalformedScore { match_id: String, raw: String },

    /// A game entry that could not be read; skipped
    MalformedGame {
        match_id: String,
        game: String,
        reason: String,
    },

    /// Week missing or zero; week 1 used instead
    InvalidWeek { match_id: String },

    /// Date text that is neither `YYYY-MM-DD` nor RFC 3339; dropped
    UnparseableDate { match_id: String, raw: String },

    /// A match entry that is not a match object at all; skipped
    UnreadableMatch {
        division: u32,
        index: usize,
        reason: String,
    },

    /// A roster entry that is not a player; skipped
    UnreadablePlayer {
        team_id: String,
        index: usize,
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedScore { match_id, raw } => {
                write!(f, "match {}: malformed score {}", match_id, raw)
            }
            Diagnostic::MalformedGame {
                match_id,
                game,
                reason,
            } => write!(f, "match {}: skipped game {}: {}", match_id, game, reason),
            Diagnostic::InvalidWeek { match_id } => {
                write!(f, "match {}: missing or zero week, using week 1", match_id)
            }
            Diagnostic::UnparseableDate { match_id, raw } => {
                write!(f, "match {}: unparseable date {:?}", match_id, raw)
            }
            Diagnostic::UnreadableMatch {
                division,
                index,
                reason,
            } => write!(
                f,
                "division {} entry {}: not a match: {}",
                division, index, reason
            ),
            Diagnostic::UnreadablePlayer {
                team_id,
                index,
                reason,
            } => write!(
                f,
                "team {} player {}: unreadable: {}",
                team_id, index, reason
            ),
        }
    }
}

/// A normalized value plus everything that had to be fixed up to get it.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> IngestReport<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// A value that needed no fixing.
    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::MalformedScore {
            match_id: "m1".to_string(),
            raw: "[2]".to_string(),
        };
        assert_eq!(d.to_string(), "match m1: malformed score [2]");

        let d = Diagnostic::UnreadableMatch {
            division: 2,
            index: 4,
            reason: "missing field `team1Id`".to_string(),
        };
        assert!(d.to_string().starts_with("division 2 entry 4"));
    }

    #[test]
    fn test_diagnostic_serialization() {
        let d = Diagnostic::InvalidWeek {
            match_id: "m1".to_string(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "invalid_week");
        assert_eq!(json["match_id"], "m1");
    }

    #[test]
    fn test_report_parts() {
        let report = IngestReport::clean(3);
        assert!(report.is_clean());
        assert_eq!(report.into_parts(), (3, vec![]));
    }
}
