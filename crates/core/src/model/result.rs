use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};
use thiserror::Error;

use crate::model::{FactorPair, QuestionRecord, QuizConfig, QuizResultId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("too many questions for a single result: {len}")]
    TooManyQuestions { len: usize },

    #[error("correct ({correct}) + wrong ({wrong}) does not match total ({total})")]
    CountMismatch { total: u32, correct: u32, wrong: u32 },

    #[error("total questions ({total}) does not match stored questions ({len})")]
    QuestionCountMismatch { total: u32, len: usize },
}

/// Summary of a completed quiz run.
///
/// Built once at completion and append-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    id: QuizResultId,
    date: String,
    config: QuizConfig,
    total_score: u32,
    correct_count: u32,
    wrong_count: u32,
    total_questions: u32,
    average_time_ms: f64,
    questions: Vec<QuestionRecord>,
}

/// Local date/time string stored alongside each result.
#[must_use]
pub fn format_display_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y/%m/%d %H:%M").to_string()
}

impl QuizResult {
    /// Aggregate a finished run.
    ///
    /// The total score is clamped at zero as a whole; individual records keep
    /// their raw scores. An empty run (a timed quiz with no answers) averages
    /// to `0.0`.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::TooManyQuestions` if the record count cannot fit in `u32`.
    pub fn from_records(
        config: QuizConfig,
        questions: Vec<QuestionRecord>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        let len = questions.len();
        let total_questions =
            u32::try_from(len).map_err(|_| QuizResultError::TooManyQuestions { len })?;

        let correct_count = questions.iter().filter(|q| q.is_correct()).count();
        // `correct_count <= len`, which already fits in u32.
        let correct_count = u32::try_from(correct_count)
            .map_err(|_| QuizResultError::TooManyQuestions { len })?;
        let wrong_count = total_questions - correct_count;

        let raw_score: i64 = questions.iter().map(|q| i64::from(q.score())).sum();
        let total_score = u32::try_from(raw_score.max(0)).unwrap_or(u32::MAX);

        let average_time_ms = if questions.is_empty() {
            0.0
        } else {
            let total_ms: u64 = questions.iter().map(QuestionRecord::time_taken_ms).sum();
            #[allow(clippy::cast_precision_loss)]
            let avg = total_ms as f64 / len as f64;
            avg
        };

        Ok(Self {
            id: QuizResultId::from_timestamp(completed_at),
            date: format_display_date(completed_at),
            config,
            total_score,
            correct_count,
            wrong_count,
            total_questions,
            average_time_ms,
            questions,
        })
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError` if the stored counts disagree with each other
    /// or with the stored question list.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: QuizResultId,
        date: String,
        config: QuizConfig,
        total_score: u32,
        correct_count: u32,
        wrong_count: u32,
        total_questions: u32,
        average_time_ms: f64,
        questions: Vec<QuestionRecord>,
    ) -> Result<Self, QuizResultError> {
        if correct_count.checked_add(wrong_count) != Some(total_questions) {
            return Err(QuizResultError::CountMismatch {
                total: total_questions,
                correct: correct_count,
                wrong: wrong_count,
            });
        }
        if usize::try_from(total_questions).ok() != Some(questions.len()) {
            return Err(QuizResultError::QuestionCountMismatch {
                total: total_questions,
                len: questions.len(),
            });
        }

        Ok(Self {
            id,
            date,
            config,
            total_score,
            correct_count,
            wrong_count,
            total_questions,
            average_time_ms,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizResultId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn average_time_ms(&self) -> f64 {
        self.average_time_ms
    }

    #[must_use]
    pub fn average_time_secs(&self) -> f64 {
        self.average_time_ms / 1000.0
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    /// Share of correct answers as a rounded percentage; 0 when nothing was answered.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let ratio = f64::from(self.correct_count) / f64::from(self.total_questions);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (ratio * 100.0).round() as u32;
        percent
    }

    /// Distinct wrongly answered factor pairs, in the order first missed.
    #[must_use]
    pub fn missed_pairs(&self) -> Vec<FactorPair> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .filter(|q| !q.is_correct())
            .map(QuestionRecord::pair)
            .filter(|pair| seen.insert(*pair))
            .collect()
    }

    /// More than 70% correct.
    #[must_use]
    pub fn is_celebration(&self) -> bool {
        u64::from(self.correct_count) * 10 > u64::from(self.total_questions) * 7
    }
}
