use quiz_core::model::{AnswerMode, QuizConfig, QuizMode, QuizResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryItemVm {
    pub id: String,
    pub date: String,
    pub score: u32,
    pub correct: u32,
    pub total: u32,
    pub accuracy: u32,
    pub description: String,
    pub numbers: String,
}

impl From<&QuizResult> for HistoryItemVm {
    fn from(result: &QuizResult) -> Self {
        let numbers = result
            .config()
            .selected_numbers()
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: result.id().to_string(),
            date: result.date().to_string(),
            score: result.total_score(),
            correct: result.correct_count(),
            total: result.total_questions(),
            accuracy: result.accuracy_percent(),
            description: describe_config(result.config()),
            numbers,
        }
    }
}

/// Short label such as `10 questions, typing`.
#[must_use]
pub fn describe_config(config: &QuizConfig) -> String {
    let limit = match config.mode() {
        QuizMode::Count => format!("{} questions", config.limit()),
        QuizMode::Timed => format!("{} seconds", config.limit()),
    };
    let answers = match config.answer_mode() {
        AnswerMode::Typing => "typing",
        AnswerMode::MultipleChoice => "multiple choice",
    };
    format!("{limit}, {answers}")
}

#[must_use]
pub fn map_history<'a>(results: impl IntoIterator<Item = &'a QuizResult>) -> Vec<HistoryItemVm> {
    results.into_iter().map(HistoryItemVm::from).collect()
}
