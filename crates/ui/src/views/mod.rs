mod active;
mod history;
mod quiz;
mod results;
mod setup;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use active::ActiveView;
pub use history::HistoryPanel;
pub use quiz::QuizView;
pub use results::ResultsView;
pub use setup::SetupView;
pub use state::{ViewError, ViewState, view_state_from_resource};
