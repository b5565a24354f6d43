mod history_vm;
mod quiz_vm;
mod results_vm;
mod time_fmt;

pub use history_vm::{HistoryItemVm, describe_config, map_history};
pub use quiz_vm::{ActiveVm, FeedbackVm, map_active};
pub use results_vm::{ResultsVm, map_results};
pub use time_fmt::{format_clock, format_seconds};
