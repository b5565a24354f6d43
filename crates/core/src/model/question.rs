use std::fmt;

use thiserror::Error;

use crate::model::config::{MAX_FACTOR, MIN_FACTOR};
use crate::scoring;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("factor {0} is outside 1..=10")]
    FactorOutOfRange(i64),

    #[error("stored correct answer {stored} does not match {expected}")]
    WrongProduct { stored: i64, expected: i64 },

    #[error("stored correctness flag disagrees with the answers")]
    CorrectnessMismatch,
}

/// The two integers multiplied to form a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactorPair {
    num1: u8,
    num2: u8,
}

impl FactorPair {
    /// # Errors
    ///
    /// Returns `QuestionError::FactorOutOfRange` if either factor is outside 1..=10.
    pub fn new(num1: u8, num2: u8) -> Result<Self, QuestionError> {
        for n in [num1, num2] {
            if !(MIN_FACTOR..=MAX_FACTOR).contains(&n) {
                return Err(QuestionError::FactorOutOfRange(i64::from(n)));
            }
        }
        Ok(Self { num1, num2 })
    }

    #[must_use]
    pub fn num1(&self) -> u8 {
        self.num1
    }

    #[must_use]
    pub fn num2(&self) -> u8 {
        self.num2
    }

    #[must_use]
    pub fn product(&self) -> i64 {
        i64::from(self.num1) * i64::from(self.num2)
    }
}

impl fmt::Display for FactorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.num1, self.num2)
    }
}

/// One answered question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pair: FactorPair,
    user_answer: i64,
    correct_answer: i64,
    is_correct: bool,
    time_taken_ms: u64,
    score: i32,
}

impl QuestionRecord {
    /// Grade an answer and score it.
    #[must_use]
    pub fn answered(pair: FactorPair, user_answer: i64, time_taken_ms: u64) -> Self {
        let correct_answer = pair.product();
        let is_correct = user_answer == correct_answer;
        Self {
            pair,
            user_answer,
            correct_answer,
            is_correct,
            time_taken_ms,
            score: scoring::score(is_correct, time_taken_ms),
        }
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// The stored score is kept as-is; only the arithmetic is re-checked.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if a factor is out of range, the stored product is
    /// wrong, or the correctness flag disagrees with the answers.
    pub fn from_persisted(
        num1: i64,
        num2: i64,
        user_answer: i64,
        correct_answer: i64,
        is_correct: bool,
        time_taken_ms: u64,
        score: i32,
    ) -> Result<Self, QuestionError> {
        let to_factor =
            |n: i64| u8::try_from(n).map_err(|_| QuestionError::FactorOutOfRange(n));
        let pair = FactorPair::new(to_factor(num1)?, to_factor(num2)?)?;

        let expected = pair.product();
        if correct_answer != expected {
            return Err(QuestionError::WrongProduct {
                stored: correct_answer,
                expected,
            });
        }
        if is_correct != (user_answer == correct_answer) {
            return Err(QuestionError::CorrectnessMismatch);
        }

        Ok(Self {
            pair,
            user_answer,
            correct_answer,
            is_correct,
            time_taken_ms,
            score,
        })
    }

    #[must_use]
    pub fn pair(&self) -> FactorPair {
        self.pair
    }

    #[must_use]
    pub fn num1(&self) -> u8 {
        self.pair.num1()
    }

    #[must_use]
    pub fn num2(&self) -> u8 {
        self.pair.num2()
    }

    #[must_use]
    pub fn user_answer(&self) -> i64 {
        self.user_answer
    }

    #[must_use]
    pub fn correct_answer(&self) -> i64 {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn time_taken_ms(&self) -> u64 {
        self.time_taken_ms
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_rejects_out_of_range() {
        assert!(FactorPair::new(0, 5).is_err());
        assert!(FactorPair::new(5, 11).is_err());
        assert_eq!(FactorPair::new(10, 10).unwrap().product(), 100);
    }

    #[test]
    fn pair_display_uses_times_sign() {
        assert_eq!(FactorPair::new(7, 8).unwrap().to_string(), "7 × 8");
    }

    #[test]
    fn answered_grades_and_scores() {
        let pair = FactorPair::new(6, 7).unwrap();

        let right = QuestionRecord::answered(pair, 42, 1_200);
        assert!(right.is_correct());
        assert_eq!(right.correct_answer(), 42);
        assert_eq!(right.score(), 150);

        let wrong = QuestionRecord::answered(pair, 48, 1_200);
        assert!(!wrong.is_correct());
        assert_eq!(wrong.score(), -50);
    }

    #[test]
    fn persisted_record_checks_arithmetic() {
        assert!(QuestionRecord::from_persisted(3, 4, 12, 12, true, 900, 150).is_ok());
        assert_eq!(
            QuestionRecord::from_persisted(3, 4, 12, 13, false, 900, -50).unwrap_err(),
            QuestionError::WrongProduct {
                stored: 13,
                expected: 12
            }
        );
        assert_eq!(
            QuestionRecord::from_persisted(3, 4, 11, 12, true, 900, 150).unwrap_err(),
            QuestionError::CorrectnessMismatch
        );
        assert_eq!(
            QuestionRecord::from_persisted(300, 4, 1200, 1200, true, 900, 150).unwrap_err(),
            QuestionError::FactorOutOfRange(300)
        );
    }
}
