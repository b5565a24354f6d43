use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Smallest factor a question may use.
pub const MIN_FACTOR: u8 = 1;
/// Largest factor a question may use.
pub const MAX_FACTOR: u8 = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizConfigError {
    #[error("at least one number must be selected")]
    EmptySelection,

    #[error("selected number {0} is outside 1..=10")]
    NumberOutOfRange(u8),

    #[error("limit must be > 0")]
    ZeroLimit,

    #[error("unknown quiz mode: {0}")]
    UnknownMode(String),

    #[error("unknown answer mode: {0}")]
    UnknownAnswerMode(String),
}

//
// ─── MODES ─────────────────────────────────────────────────────────────────────
//

/// How a quiz run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuizMode {
    /// Ends after a fixed number of answered questions.
    #[default]
    Count,
    /// Ends when the countdown reaches zero.
    Timed,
}

/// Slider bounds for the limit of a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitBounds {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

impl LimitBounds {
    /// Clamp into `[min, max]` and snap down onto the step grid.
    #[must_use]
    pub fn snap(&self, value: u32) -> u32 {
        let clamped = value.clamp(self.min, self.max);
        self.min + (clamped - self.min) / self.step * self.step
    }
}

impl QuizMode {
    #[must_use]
    pub fn limit_bounds(self) -> LimitBounds {
        match self {
            QuizMode::Count => LimitBounds {
                min: 5,
                max: 100,
                step: 5,
                default: 10,
            },
            QuizMode::Timed => LimitBounds {
                min: 30,
                max: 300,
                step: 10,
                default: 60,
            },
        }
    }

    /// Persisted tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Count => "COUNT",
            QuizMode::Timed => "TIMED",
        }
    }
}

impl FromStr for QuizMode {
    type Err = QuizConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COUNT" => Ok(Self::Count),
            "TIMED" => Ok(Self::Timed),
            other => Err(QuizConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the respondent enters answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnswerMode {
    #[default]
    Typing,
    MultipleChoice,
}

impl AnswerMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerMode::Typing => "TYPING",
            AnswerMode::MultipleChoice => "MULTIPLE_CHOICE",
        }
    }
}

impl FromStr for AnswerMode {
    type Err = QuizConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TYPING" => Ok(Self::Typing),
            "MULTIPLE_CHOICE" => Ok(Self::MultipleChoice),
            other => Err(QuizConfigError::UnknownAnswerMode(other.to_string())),
        }
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Validated configuration for one quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    mode: QuizMode,
    answer_mode: AnswerMode,
    limit: u32,
    selected_numbers: Vec<u8>,
}

/// Mutable setup-screen state, validated into a `QuizConfig` on start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfigDraft {
    pub mode: QuizMode,
    pub answer_mode: AnswerMode,
    pub limit: u32,
    pub selected_numbers: Vec<u8>,
}

impl Default for QuizConfigDraft {
    fn default() -> Self {
        Self {
            mode: QuizMode::Count,
            answer_mode: AnswerMode::Typing,
            limit: QuizMode::Count.limit_bounds().default,
            selected_numbers: Vec::new(),
        }
    }
}

impl QuizConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch mode and reset the limit to that mode's default.
    pub fn set_mode(&mut self, mode: QuizMode) {
        self.mode = mode;
        self.limit = mode.limit_bounds().default;
    }

    /// Set the limit, snapped to the current mode's slider bounds.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = self.mode.limit_bounds().snap(limit);
    }

    /// Add the number if missing, remove it otherwise. Keeps the list sorted.
    pub fn toggle_number(&mut self, number: u8) {
        if let Some(pos) = self.selected_numbers.iter().position(|n| *n == number) {
            self.selected_numbers.remove(pos);
        } else {
            self.selected_numbers.push(number);
            self.selected_numbers.sort_unstable();
        }
    }

    pub fn select_all(&mut self) {
        self.selected_numbers = (MIN_FACTOR..=MAX_FACTOR).collect();
    }

    pub fn clear_numbers(&mut self) {
        self.selected_numbers.clear();
    }

    #[must_use]
    pub fn is_selected(&self, number: u8) -> bool {
        self.selected_numbers.contains(&number)
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        !self.selected_numbers.is_empty()
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `QuizConfigError` if no number is selected, a number is outside
    /// `MIN_FACTOR..=MAX_FACTOR`, or the limit is zero.
    pub fn validate(self) -> Result<QuizConfig, QuizConfigError> {
        if self.limit == 0 {
            return Err(QuizConfigError::ZeroLimit);
        }
        if let Some(bad) = self
            .selected_numbers
            .iter()
            .copied()
            .find(|n| !(MIN_FACTOR..=MAX_FACTOR).contains(n))
        {
            return Err(QuizConfigError::NumberOutOfRange(bad));
        }

        let selected_numbers: Vec<u8> = self
            .selected_numbers
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if selected_numbers.is_empty() {
            return Err(QuizConfigError::EmptySelection);
        }

        Ok(QuizConfig {
            mode: self.mode,
            answer_mode: self.answer_mode,
            limit: self.limit,
            selected_numbers,
        })
    }
}

impl QuizConfig {
    /// Rehydrate a configuration from persisted storage.
    ///
    /// Slider bounds are not enforced here so older results stay loadable.
    ///
    /// # Errors
    ///
    /// Returns `QuizConfigError` under the same rules as `QuizConfigDraft::validate`.
    pub fn from_persisted(
        mode: QuizMode,
        answer_mode: AnswerMode,
        limit: u32,
        selected_numbers: Vec<u8>,
    ) -> Result<Self, QuizConfigError> {
        QuizConfigDraft {
            mode,
            answer_mode,
            limit,
            selected_numbers,
        }
        .validate()
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn answer_mode(&self) -> AnswerMode {
        self.answer_mode
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn selected_numbers(&self) -> &[u8] {
        &self.selected_numbers
    }

    /// Draft pre-filled with this configuration. The limit is snapped to the
    /// slider bounds, since persisted results may predate them.
    #[must_use]
    pub fn to_draft(&self) -> QuizConfigDraft {
        let mut draft = QuizConfigDraft {
            mode: self.mode,
            answer_mode: self.answer_mode,
            limit: self.limit,
            selected_numbers: self.selected_numbers.clone(),
        };
        draft.set_limit(self.limit);
        draft
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
