use storage::repository::Storage;

use crate::Clock;
use crate::controller::QuizController;
use crate::error::{AppServicesError, ControllerError};
use crate::history_service::HistoryService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    history: HistoryService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Sqlite` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            clock,
            history: HistoryService::new(storage.history.clone()),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn history(&self) -> HistoryService {
        self.history.clone()
    }

    /// Controller seeded with the stored history.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::History` if storage cannot be reached.
    pub async fn controller(&self) -> Result<QuizController, ControllerError> {
        QuizController::bootstrap(self.history(), self.clock).await
    }
}
