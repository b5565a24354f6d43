use quiz_core::model::QuizResult;

use super::history_vm::describe_config;
use super::time_fmt::format_seconds;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub total_score: u32,
    pub accuracy: u32,
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
    pub average_secs: String,
    pub missed: Vec<String>,
    pub celebrate: bool,
    pub description: String,
}

impl From<&QuizResult> for ResultsVm {
    fn from(result: &QuizResult) -> Self {
        Self {
            total_score: result.total_score(),
            accuracy: result.accuracy_percent(),
            correct: result.correct_count(),
            wrong: result.wrong_count(),
            total: result.total_questions(),
            average_secs: format_seconds(result.average_time_secs()),
            missed: result
                .missed_pairs()
                .iter()
                .map(|pair| format!("{pair} = {}", pair.product()))
                .collect(),
            celebrate: result.is_celebration(),
            description: describe_config(result.config()),
        }
    }
}

#[must_use]
pub fn map_results(result: &QuizResult) -> ResultsVm {
    ResultsVm::from(result)
}
