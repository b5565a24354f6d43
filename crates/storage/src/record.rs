//! Persisted JSON shape of the quiz history.
//!
//! These types mirror the domain results so the storage layer can
//! serialize them without serde leaking into `quiz-core`. Field names are
//! camelCase to stay compatible with histories written by earlier versions.

use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AnswerMode, QuestionRecord, QuizConfig, QuizMode, QuizResult, QuizResultId,
};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub mode: String,
    pub answer_mode: String,
    pub limit: u32,
    pub selected_numbers: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub num1: i64,
    pub num2: i64,
    pub user_answer: i64,
    pub correct_answer: i64,
    pub is_correct: bool,
    #[serde(rename = "timeTaken")]
    pub time_taken_ms: u64,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRecord {
    pub id: String,
    pub date: String,
    pub config: ConfigRecord,
    pub total_score: i64,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub total_questions: u32,
    #[serde(rename = "averageTime")]
    pub average_time_ms: f64,
    pub questions: Vec<QuestionRow>,
}

impl ConfigRecord {
    #[must_use]
    pub fn from_config(config: &QuizConfig) -> Self {
        Self {
            mode: config.mode().as_str().to_owned(),
            answer_mode: config.answer_mode().as_str().to_owned(),
            limit: config.limit(),
            selected_numbers: config.selected_numbers().to_vec(),
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for unknown mode tags or an invalid selection.
    pub fn into_config(self) -> Result<QuizConfig, StorageError> {
        let mode: QuizMode = self.mode.parse().map_err(ser)?;
        let answer_mode: AnswerMode = self.answer_mode.parse().map_err(ser)?;
        QuizConfig::from_persisted(mode, answer_mode, self.limit, self.selected_numbers)
            .map_err(ser)
    }
}

impl QuestionRow {
    #[must_use]
    pub fn from_question(question: &QuestionRecord) -> Self {
        Self {
            num1: i64::from(question.num1()),
            num2: i64::from(question.num2()),
            user_answer: question.user_answer(),
            correct_answer: question.correct_answer(),
            is_correct: question.is_correct(),
            time_taken_ms: question.time_taken_ms(),
            score: question.score(),
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored arithmetic is inconsistent.
    pub fn into_question(self) -> Result<QuestionRecord, StorageError> {
        QuestionRecord::from_persisted(
            self.num1,
            self.num2,
            self.user_answer,
            self.correct_answer,
            self.is_correct,
            self.time_taken_ms,
            self.score,
        )
        .map_err(ser)
    }
}

impl QuizResultRecord {
    #[must_use]
    pub fn from_result(result: &QuizResult) -> Self {
        Self {
            id: result.id().to_string(),
            date: result.date().to_owned(),
            config: ConfigRecord::from_config(result.config()),
            total_score: i64::from(result.total_score()),
            correct_count: result.correct_count(),
            wrong_count: result.wrong_count(),
            total_questions: result.total_questions(),
            average_time_ms: result.average_time_ms(),
            questions: result
                .questions()
                .iter()
                .map(QuestionRow::from_question)
                .collect(),
        }
    }

    /// Convert the record back into a domain `QuizResult`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any field fails domain validation,
    /// including a negative total score.
    pub fn into_result(self) -> Result<QuizResult, StorageError> {
        let id: QuizResultId = self.id.parse().map_err(ser)?;
        let total_score = u32::try_from(self.total_score).map_err(|_| {
            StorageError::Serialization(format!("invalid totalScore: {}", self.total_score))
        })?;
        let config = self.config.into_config()?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionRow::into_question)
            .collect::<Result<Vec<_>, _>>()?;

        QuizResult::from_persisted(
            id,
            self.date,
            config,
            total_score,
            self.correct_count,
            self.wrong_count,
            self.total_questions,
            self.average_time_ms,
            questions,
        )
        .map_err(ser)
    }
}

/// Serialize the full history into one JSON document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_history(history: &[QuizResult]) -> Result<String, StorageError> {
    let records: Vec<QuizResultRecord> =
        history.iter().map(QuizResultRecord::from_result).collect();
    serde_json::to_string(&records).map_err(ser)
}

/// Parse a JSON document written by `encode_history`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON or records that fail validation.
pub fn decode_history(raw: &str) -> Result<Vec<QuizResult>, StorageError> {
    let records: Vec<QuizResultRecord> = serde_json::from_str(raw).map_err(ser)?;
    records
        .into_iter()
        .map(QuizResultRecord::into_result)
        .collect()
}
