use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Identity of a stored quiz result: the completion time in Unix milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuizResultId(u64);

impl QuizResultId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Derive the id from a completion timestamp. Pre-epoch times map to 0.
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(u64::try_from(at.timestamp_millis()).unwrap_or_default())
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for QuizResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuizResultId({})", self.0)
    }
}

impl fmt::Display for QuizResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing an id from its persisted string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse QuizResultId from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuizResultId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(QuizResultId::new).map_err(|_| ParseIdError {
            raw: s.to_string(),
        })
    }
}
