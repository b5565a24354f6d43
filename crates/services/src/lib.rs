#![forbid(unsafe_code)]

pub mod app_services;
pub mod controller;
pub mod error;
pub mod history_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use controller::{ControllerStep, HistoryWrite, QuizController, Screen};
pub use error::{AppServicesError, ControllerError, HistoryError, SessionError};
pub use history_service::{HistoryChange, HistoryService};
pub use sessions::{
    FEEDBACK_DWELL, Feedback, IgnoreReason, QuizSession, SessionPhase, SessionProgress,
    SessionStep, SessionToken, SubmitOutcome, TICK_INTERVAL,
};
