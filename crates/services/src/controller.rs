//! Screen-level orchestration: setup, running quiz, results, and history.
//!
//! State changes are synchronous so the UI can apply them under a short
//! signal borrow. Persistence is returned as a `HistoryWrite` the caller
//! awaits afterwards.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::model::{QuizConfig, QuizConfigDraft, QuizResult};

use crate::error::{ControllerError, SessionError};
use crate::history_service::{HistoryChange, HistoryService};
use crate::sessions::{
    IgnoreReason, QuizSession, SessionStep, SessionToken, SubmitOutcome, TokenIssuer,
};

/// Which screen the app is on, with the state that screen owns.
#[derive(Debug)]
pub enum Screen {
    Setup,
    Active(QuizSession),
    Results(QuizResult),
}

/// Pending write of the history to storage.
///
/// Writes carry the revision they were issued with, so applying them out of
/// order never lets an older snapshot overwrite a newer one.
#[must_use = "history changes are only persisted once applied"]
pub struct HistoryWrite {
    service: HistoryService,
    revision: u64,
    change: HistoryChange,
}

impl HistoryWrite {
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Run the write, or skip it if a later one was already stored.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::History` if storage rejects the write. The
    /// controller's in-memory history is unaffected either way.
    pub async fn apply(self) -> Result<(), ControllerError> {
        self.service
            .commit(self.revision, &self.change)
            .await
            .map(|_| ())
            .map_err(|err| {
                warn!(error = %err, revision = self.revision, "failed to persist quiz history");
                ControllerError::from(err)
            })
    }
}

/// What a timer or dwell callback did.
#[must_use]
pub enum ControllerStep {
    Running,
    Stale,
    /// The run finished and the screen moved to results.
    Completed(HistoryWrite),
}

impl ControllerStep {
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

pub struct QuizController {
    clock: Clock,
    history_service: HistoryService,
    history: Vec<QuizResult>,
    screen: Screen,
    last_config: Option<QuizConfig>,
    rng: StdRng,
    tokens: TokenIssuer,
}

impl QuizController {
    #[must_use]
    pub fn new(history_service: HistoryService, clock: Clock, history: Vec<QuizResult>) -> Self {
        Self {
            clock,
            history_service,
            history,
            screen: Screen::Setup,
            last_config: None,
            rng: StdRng::from_os_rng(),
            tokens: TokenIssuer::new(),
        }
    }

    /// Load the stored history once and land on the setup screen.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::History` if storage cannot be reached.
    pub async fn bootstrap(
        history_service: HistoryService,
        clock: Clock,
    ) -> Result<Self, ControllerError> {
        let history = history_service.load().await?;
        info!(results = history.len(), "quiz history loaded");
        Ok(Self::new(history_service, clock, history))
    }

    /// Replace the question source with a seeded one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn active_session(&self) -> Option<&QuizSession> {
        match &self.screen {
            Screen::Active(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&QuizResult> {
        match &self.screen {
            Screen::Results(result) => Some(result),
            _ => None,
        }
    }

    /// History in completion order, oldest first.
    #[must_use]
    pub fn history(&self) -> &[QuizResult] {
        &self.history
    }

    pub fn history_newest_first(&self) -> impl Iterator<Item = &QuizResult> {
        self.history.iter().rev()
    }

    /// Setup-screen draft: the last started configuration, else the newest
    /// stored one, else defaults.
    #[must_use]
    pub fn setup_draft(&self) -> QuizConfigDraft {
        self.last_config
            .as_ref()
            .or_else(|| self.history.last().map(QuizResult::config))
            .map_or_else(QuizConfigDraft::new, QuizConfig::to_draft)
    }

    /// Validate the draft and begin a run.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NotOnSetup` outside the setup screen, or
    /// `ControllerError::Session` if the draft is invalid.
    pub fn start(&mut self, draft: QuizConfigDraft) -> Result<SessionToken, ControllerError> {
        if !matches!(self.screen, Screen::Setup) {
            return Err(ControllerError::NotOnSetup);
        }
        let config = draft.validate().map_err(SessionError::from)?;
        let token = self.tokens.issue();
        let rng = StdRng::from_rng(&mut self.rng);
        let session = QuizSession::start(config, token, rng, self.clock.now())?;

        info!(
            %token,
            mode = %session.config().mode(),
            answer_mode = %session.config().answer_mode(),
            limit = session.config().limit(),
            "quiz started"
        );
        self.last_config = Some(session.config().clone());
        self.screen = Screen::Active(session);
        Ok(token)
    }

    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        let now = self.clock.now();
        let outcome = match &mut self.screen {
            Screen::Active(session) => session.submit(raw, now),
            _ => SubmitOutcome::Ignored(IgnoreReason::Finished),
        };
        trace_ignored(&outcome);
        outcome
    }

    pub fn choose(&mut self, candidate: i64) -> SubmitOutcome {
        let now = self.clock.now();
        let outcome = match &mut self.screen {
            Screen::Active(session) => session.choose(candidate, now),
            _ => SubmitOutcome::Ignored(IgnoreReason::Finished),
        };
        trace_ignored(&outcome);
        outcome
    }

    /// Forward a one-second tick.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Session` if the finished run cannot be aggregated.
    pub fn tick(&mut self, token: SessionToken) -> Result<ControllerStep, ControllerError> {
        let step = match &mut self.screen {
            Screen::Active(session) => session.tick(token),
            _ => SessionStep::Stale,
        };
        self.follow(step)
    }

    /// Forward the end of a feedback dwell.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Session` if the next question cannot be drawn
    /// or the finished run cannot be aggregated.
    pub fn finish_feedback(
        &mut self,
        token: SessionToken,
    ) -> Result<ControllerStep, ControllerError> {
        let now = self.clock.now();
        let step = match &mut self.screen {
            Screen::Active(session) => session.finish_feedback(token, now)?,
            _ => SessionStep::Stale,
        };
        self.follow(step)
    }

    /// Abandon the running quiz. Nothing is recorded.
    pub fn cancel(&mut self) -> bool {
        let Screen::Active(session) = &mut self.screen else {
            return false;
        };
        session.cancel();
        info!(token = %session.token(), "quiz cancelled");
        self.screen = Screen::Setup;
        true
    }

    /// Leave the results screen for a new setup.
    pub fn restart(&mut self) -> bool {
        if matches!(self.screen, Screen::Results(_)) {
            self.screen = Screen::Setup;
            true
        } else {
            false
        }
    }

    /// Empty the history, but only once the user has confirmed.
    pub fn clear_history(&mut self, confirmed: bool) -> Option<HistoryWrite> {
        if !confirmed {
            return None;
        }
        info!(results = self.history.len(), "clearing quiz history");
        self.history.clear();
        Some(self.write(HistoryChange::Clear))
    }

    fn follow(&mut self, step: SessionStep) -> Result<ControllerStep, ControllerError> {
        match step {
            SessionStep::Running => Ok(ControllerStep::Running),
            SessionStep::Stale => Ok(ControllerStep::Stale),
            SessionStep::Completed => self.complete(),
        }
    }

    fn complete(&mut self) -> Result<ControllerStep, ControllerError> {
        let Screen::Active(session) = std::mem::replace(&mut self.screen, Screen::Setup) else {
            return Ok(ControllerStep::Stale);
        };
        let config = session.config().clone();
        let records = session.into_records();
        let result = QuizResult::from_records(config, records, self.clock.now())
            .map_err(SessionError::from)?;

        info!(
            id = %result.id(),
            score = result.total_score(),
            correct = result.correct_count(),
            total = result.total_questions(),
            "quiz completed"
        );
        self.history.push(result.clone());
        self.screen = Screen::Results(result);
        Ok(ControllerStep::Completed(
            self.write(HistoryChange::Replace(self.history.clone())),
        ))
    }

    fn write(&self, change: HistoryChange) -> HistoryWrite {
        HistoryWrite {
            service: self.history_service.clone(),
            revision: self.history_service.next_revision(),
            change,
        }
    }
}

fn trace_ignored(outcome: &SubmitOutcome) {
    if let SubmitOutcome::Ignored(reason) = outcome {
        debug!(?reason, "answer ignored");
    }
}
