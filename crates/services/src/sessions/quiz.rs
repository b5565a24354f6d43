use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;

use quiz_core::choices::build_choices;
use quiz_core::generator::generate;
use quiz_core::model::{AnswerMode, FactorPair, QuestionRecord, QuizConfig, QuizMode};
use quiz_core::time::elapsed_millis;

use super::progress::SessionProgress;
use super::token::SessionToken;
use crate::error::SessionError;

/// How long correct/wrong feedback stays on screen before the next question.
pub const FEEDBACK_DWELL: Duration = Duration::from_millis(600);

/// Period of the session clock.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

//
// ─── STATES & OUTCOMES ─────────────────────────────────────────────────────────
//

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingAnswer,
    Feedback(Feedback),
    Completed,
    Cancelled,
}

impl SessionPhase {
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Why an answer attempt left the session untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    NotANumber,
    NotACandidate,
    FeedbackPending,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The answer was recorded; the UI should show feedback for `FEEDBACK_DWELL`.
    Recorded {
        feedback: Feedback,
        record: QuestionRecord,
    },
    Ignored(IgnoreReason),
}

/// Result of a timer or dwell callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStep {
    Running,
    Completed,
    /// The callback belongs to a finished or replaced session.
    Stale,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz run, from the first question to completion or cancellation.
///
/// Timestamps are passed in by the caller so a fixed clock makes answer
/// timing deterministic.
#[derive(Debug)]
pub struct QuizSession {
    config: QuizConfig,
    token: SessionToken,
    rng: StdRng,
    phase: SessionPhase,
    question: FactorPair,
    choices: Vec<i64>,
    question_started_at: DateTime<Utc>,
    records: Vec<QuestionRecord>,
    elapsed_secs: u32,
    remaining_secs: u32,
}

impl QuizSession {
    /// Draw the first question and start timing it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generator` if no question can be drawn from the
    /// configured numbers.
    pub fn start(
        config: QuizConfig,
        token: SessionToken,
        mut rng: StdRng,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let question = generate(&mut rng, config.selected_numbers())?;
        let choices = choices_for(&config, &mut rng, question);
        let remaining_secs = match config.mode() {
            QuizMode::Timed => config.limit(),
            QuizMode::Count => 0,
        };

        Ok(Self {
            config,
            token,
            rng,
            phase: SessionPhase::AwaitingAnswer,
            question,
            choices,
            question_started_at: now,
            records: Vec::new(),
            elapsed_secs: 0,
            remaining_secs,
        })
    }

    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        match self.phase {
            SessionPhase::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }

    #[must_use]
    pub fn question(&self) -> FactorPair {
        self.question
    }

    /// Four candidates in multiple-choice mode, empty when typing.
    #[must_use]
    pub fn choices(&self) -> &[i64] {
        &self.choices
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    /// True if callbacks scheduled with `token` should still act on this session.
    #[must_use]
    pub fn accepts(&self, token: SessionToken) -> bool {
        token == self.token && !self.is_finished()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answered = self.records.len();
        let correct = self.records.iter().filter(|r| r.is_correct()).count();
        let running_score = self.records.iter().map(|r| i64::from(r.score())).sum();
        let limit = self.config.limit();

        let (clock_secs, done) = match self.config.mode() {
            QuizMode::Timed => (
                self.remaining_secs,
                limit.saturating_sub(self.remaining_secs),
            ),
            QuizMode::Count => (
                self.elapsed_secs,
                u32::try_from(answered).unwrap_or(u32::MAX),
            ),
        };
        let percent = if limit == 0 {
            0.0
        } else {
            (f64::from(done) / f64::from(limit) * 100.0).clamp(0.0, 100.0)
        };

        SessionProgress {
            answered,
            correct,
            wrong: answered - correct,
            running_score,
            clock_secs,
            percent,
        }
    }

    /// Submit typed input. Surrounding whitespace is ignored.
    pub fn submit(&mut self, raw: &str, now: DateTime<Utc>) -> SubmitOutcome {
        if let Some(reason) = self.blocked() {
            return SubmitOutcome::Ignored(reason);
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        let Ok(answer) = trimmed.parse::<i64>() else {
            return SubmitOutcome::Ignored(IgnoreReason::NotANumber);
        };
        self.record(answer, now)
    }

    /// Pick one of the offered candidates; same as typing that value.
    pub fn choose(&mut self, candidate: i64, now: DateTime<Utc>) -> SubmitOutcome {
        if let Some(reason) = self.blocked() {
            return SubmitOutcome::Ignored(reason);
        }
        if !self.choices.contains(&candidate) {
            return SubmitOutcome::Ignored(IgnoreReason::NotACandidate);
        }
        self.record(candidate, now)
    }

    /// End of the feedback dwell: complete in count mode once the limit is
    /// reached, otherwise move on to a fresh question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generator` if the next question cannot be drawn.
    pub fn finish_feedback(
        &mut self,
        token: SessionToken,
        now: DateTime<Utc>,
    ) -> Result<SessionStep, SessionError> {
        if !self.accepts(token) {
            return Ok(SessionStep::Stale);
        }
        if self.feedback().is_none() {
            return Ok(SessionStep::Running);
        }

        let limit = usize::try_from(self.config.limit()).unwrap_or(usize::MAX);
        if self.config.mode() == QuizMode::Count && self.records.len() >= limit {
            self.phase = SessionPhase::Completed;
            return Ok(SessionStep::Completed);
        }

        self.question = generate(&mut self.rng, self.config.selected_numbers())?;
        self.choices = choices_for(&self.config, &mut self.rng, self.question);
        self.question_started_at = now;
        self.phase = SessionPhase::AwaitingAnswer;
        Ok(SessionStep::Running)
    }

    /// One second has passed.
    pub fn tick(&mut self, token: SessionToken) -> SessionStep {
        if !self.accepts(token) {
            return SessionStep::Stale;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);

        if self.config.mode() == QuizMode::Timed {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                // An answer already showing feedback stays recorded; the
                // unanswered question on screen is dropped.
                self.phase = SessionPhase::Completed;
                return SessionStep::Completed;
            }
        }
        SessionStep::Running
    }

    pub fn cancel(&mut self) {
        self.phase = SessionPhase::Cancelled;
        self.records.clear();
        self.choices.clear();
    }

    /// Consume the session and hand out its records.
    #[must_use]
    pub fn into_records(self) -> Vec<QuestionRecord> {
        self.records
    }

    fn blocked(&self) -> Option<IgnoreReason> {
        match self.phase {
            SessionPhase::AwaitingAnswer => None,
            SessionPhase::Feedback(_) => Some(IgnoreReason::FeedbackPending),
            SessionPhase::Completed | SessionPhase::Cancelled => Some(IgnoreReason::Finished),
        }
    }

    fn record(&mut self, answer: i64, now: DateTime<Utc>) -> SubmitOutcome {
        let time_taken_ms = elapsed_millis(self.question_started_at, now);
        let record = QuestionRecord::answered(self.question, answer, time_taken_ms);
        let feedback = if record.is_correct() {
            Feedback::Correct
        } else {
            Feedback::Wrong
        };
        self.records.push(record.clone());
        self.phase = SessionPhase::Feedback(feedback);
        SubmitOutcome::Recorded { feedback, record }
    }
}

fn choices_for(config: &QuizConfig, rng: &mut StdRng, pair: FactorPair) -> Vec<i64> {
    match config.answer_mode() {
        AnswerMode::MultipleChoice => build_choices(rng, pair),
        AnswerMode::Typing => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::token::TokenIssuer;
    use chrono::Duration as ChronoDuration;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;

    fn config(mode: QuizMode, answer_mode: AnswerMode, limit: u32, numbers: &[u8]) -> QuizConfig {
        QuizConfig::from_persisted(mode, answer_mode, limit, numbers.to_vec()).unwrap()
    }

    fn start(config: QuizConfig) -> (QuizSession, SessionToken) {
        let token = TokenIssuer::new().issue();
        let session =
            QuizSession::start(config, token, StdRng::seed_from_u64(7), fixed_now()).unwrap();
        (session, token)
    }

    fn answer_correctly(session: &mut QuizSession, now: DateTime<Utc>) -> SubmitOutcome {
        let product = session.question().product();
        session.submit(&product.to_string(), now)
    }

    #[test]
    fn start_draws_from_selected_numbers() {
        let (session, _) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[3]));
        assert_eq!(session.question().num1(), 3);
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
        assert!(session.choices().is_empty());
        assert!(session.records().is_empty());
    }

    #[test]
    fn empty_or_garbage_input_is_ignored() {
        let (mut session, _) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[2]));
        let now = fixed_now();

        assert_eq!(
            session.submit("", now),
            SubmitOutcome::Ignored(IgnoreReason::EmptyInput)
        );
        assert_eq!(
            session.submit("   ", now),
            SubmitOutcome::Ignored(IgnoreReason::EmptyInput)
        );
        assert_eq!(
            session.submit("twelve", now),
            SubmitOutcome::Ignored(IgnoreReason::NotANumber)
        );
        assert!(session.records().is_empty());
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
    }

    #[test]
    fn correct_answer_records_time_and_bonus() {
        let (mut session, _) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[4]));
        let later = fixed_now() + ChronoDuration::milliseconds(1_500);
        let product = session.question().product();

        let outcome = session.submit(&format!("  {product} "), later);

        let SubmitOutcome::Recorded { feedback, record } = outcome else {
            panic!("answer should be recorded");
        };
        assert_eq!(feedback, Feedback::Correct);
        assert_eq!(record.time_taken_ms(), 1_500);
        assert_eq!(record.score(), 150);
        assert_eq!(session.feedback(), Some(Feedback::Correct));
    }

    #[test]
    fn wrong_answer_enters_wrong_feedback() {
        let (mut session, _) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[4]));
        let wrong = session.question().product() + 1;

        let outcome = session.submit(&wrong.to_string(), fixed_now());

        assert!(matches!(
            outcome,
            SubmitOutcome::Recorded {
                feedback: Feedback::Wrong,
                ..
            }
        ));
        assert_eq!(session.records()[0].score(), -50);
        assert_eq!(session.progress().running_score, -50);
    }

    #[test]
    fn double_submission_during_feedback_is_ignored() {
        let (mut session, _) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[5]));
        let now = fixed_now();

        assert!(matches!(
            answer_correctly(&mut session, now),
            SubmitOutcome::Recorded { .. }
        ));
        assert_eq!(
            answer_correctly(&mut session, now),
            SubmitOutcome::Ignored(IgnoreReason::FeedbackPending)
        );
        assert_eq!(session.records().len(), 1);
    }

    #[test]
    fn count_mode_completes_after_exactly_limit_answers() {
        let (mut session, token) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[2, 7]));
        let mut now = fixed_now();

        for round in 1..=10 {
            now += ChronoDuration::milliseconds(2_500);
            assert!(matches!(
                answer_correctly(&mut session, now),
                SubmitOutcome::Recorded { .. }
            ));
            let step = session.finish_feedback(token, now).unwrap();
            if round < 10 {
                assert_eq!(step, SessionStep::Running);
                assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
            } else {
                assert_eq!(step, SessionStep::Completed);
            }
        }

        assert!(session.is_finished());
        let records = session.into_records();
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|r| r.score() == 120));
    }

    #[test]
    fn next_question_restarts_the_answer_timer() {
        let (mut session, token) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[6]));
        let first_answer = fixed_now() + ChronoDuration::milliseconds(3_000);
        answer_correctly(&mut session, first_answer);
        let dwell_end = first_answer + ChronoDuration::milliseconds(600);
        session.finish_feedback(token, dwell_end).unwrap();

        answer_correctly(&mut session, dwell_end + ChronoDuration::milliseconds(1_000));

        assert_eq!(session.records()[1].time_taken_ms(), 1_000);
    }

    #[test]
    fn finish_feedback_without_feedback_is_a_no_op() {
        let (mut session, token) = start(config(QuizMode::Count, AnswerMode::Typing, 5, &[2]));
        let before = session.question();

        let step = session.finish_feedback(token, fixed_now()).unwrap();

        assert_eq!(step, SessionStep::Running);
        assert_eq!(session.question(), before);
        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
    }

    #[test]
    fn timed_mode_without_answers_completes_with_no_records() {
        let (mut session, token) = start(config(QuizMode::Timed, AnswerMode::Typing, 30, &[9]));

        for _ in 0..29 {
            assert_eq!(session.tick(token), SessionStep::Running);
        }
        assert_eq!(session.remaining_secs(), 1);
        assert_eq!(session.tick(token), SessionStep::Completed);
        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.elapsed_secs(), 30);
        assert!(session.into_records().is_empty());
    }

    #[test]
    fn timed_completion_keeps_answer_already_in_feedback() {
        let (mut session, token) = start(config(QuizMode::Timed, AnswerMode::Typing, 30, &[3]));
        for _ in 0..29 {
            session.tick(token);
        }
        answer_correctly(&mut session, fixed_now());

        assert_eq!(session.tick(token), SessionStep::Completed);
        assert_eq!(
            session.finish_feedback(token, fixed_now()).unwrap(),
            SessionStep::Stale
        );
        assert_eq!(session.into_records().len(), 1);
    }

    #[test]
    fn count_mode_tick_counts_up_and_never_completes() {
        let (mut session, token) = start(config(QuizMode::Count, AnswerMode::Typing, 5, &[3]));
        for _ in 0..500 {
            assert_eq!(session.tick(token), SessionStep::Running);
        }
        assert_eq!(session.elapsed_secs(), 500);
        assert_eq!(session.progress().clock_secs, 500);
    }

    #[test]
    fn foreign_or_finished_tokens_are_stale() {
        let mut issuer = TokenIssuer::new();
        let token = issuer.issue();
        let other = issuer.issue();
        let cfg = config(QuizMode::Timed, AnswerMode::Typing, 30, &[1]);
        let mut session =
            QuizSession::start(cfg, token, StdRng::seed_from_u64(1), fixed_now()).unwrap();

        assert_eq!(session.tick(other), SessionStep::Stale);
        assert_eq!(session.elapsed_secs(), 0);

        session.cancel();
        assert_eq!(session.tick(token), SessionStep::Stale);
        assert_eq!(
            session.submit("1", fixed_now()),
            SubmitOutcome::Ignored(IgnoreReason::Finished)
        );
    }

    #[test]
    fn cancel_discards_records() {
        let (mut session, _) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[2]));
        answer_correctly(&mut session, fixed_now());

        session.cancel();

        assert_eq!(session.phase(), SessionPhase::Cancelled);
        assert!(session.into_records().is_empty());
    }

    #[test]
    fn multiple_choice_offers_four_candidates_including_product() {
        let (mut session, token) =
            start(config(QuizMode::Count, AnswerMode::MultipleChoice, 10, &[1, 5, 10]));

        for _ in 0..10 {
            let product = session.question().product();
            assert_eq!(session.choices().len(), 4);
            assert!(session.choices().contains(&product));

            let outcome = session.choose(product, fixed_now());
            assert!(matches!(
                outcome,
                SubmitOutcome::Recorded {
                    feedback: Feedback::Correct,
                    ..
                }
            ));
            session.finish_feedback(token, fixed_now()).unwrap();
        }
        assert!(session.is_finished());
    }

    #[test]
    fn choosing_a_value_not_offered_is_ignored() {
        let (mut session, _) =
            start(config(QuizMode::Count, AnswerMode::MultipleChoice, 10, &[4]));
        let absent = (1..=200).find(|v| !session.choices().contains(v)).unwrap();

        assert_eq!(
            session.choose(absent, fixed_now()),
            SubmitOutcome::Ignored(IgnoreReason::NotACandidate)
        );
    }

    #[test]
    fn progress_tracks_count_and_timed_modes() {
        let (mut counted, token) = start(config(QuizMode::Count, AnswerMode::Typing, 10, &[2]));
        answer_correctly(&mut counted, fixed_now());
        counted.finish_feedback(token, fixed_now()).unwrap();
        let wrong = counted.question().product() + 3;
        counted.submit(&wrong.to_string(), fixed_now());

        let progress = counted.progress();
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.correct, 1);
        assert_eq!(progress.wrong, 1);
        assert_eq!(progress.running_score, 150 - 50);
        assert!((progress.percent - 20.0).abs() < 1e-9);

        let (mut timed, token) = start(config(QuizMode::Timed, AnswerMode::Typing, 60, &[2]));
        for _ in 0..15 {
            timed.tick(token);
        }
        let progress = timed.progress();
        assert_eq!(progress.clock_secs, 45);
        assert!((progress.percent - 25.0).abs() < 1e-9);
    }
}
