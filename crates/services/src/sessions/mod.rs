mod progress;
mod quiz;
mod token;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use quiz::{
    FEEDBACK_DWELL, Feedback, IgnoreReason, QuizSession, SessionPhase, SessionStep,
    SubmitOutcome, TICK_INTERVAL,
};
pub use token::{SessionToken, TokenIssuer};
