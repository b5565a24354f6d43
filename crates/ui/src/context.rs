use std::sync::Arc;

use services::{Clock, HistoryService};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn history(&self) -> HistoryService;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    history: HistoryService,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            history: app.history(),
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
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
