//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::generator::GeneratorError;
use quiz_core::model::{QuizConfigError, QuizResultError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] QuizConfigError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error(transparent)]
    Result(#[from] QuizResultError),
}

/// Errors emitted by `HistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("a quiz can only be started from the setup screen")]
    NotOnSetup,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
