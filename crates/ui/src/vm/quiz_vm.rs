use quiz_core::model::{AnswerMode, QuizMode};
use services::{Feedback, QuizSession};

use super::time_fmt::format_clock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub message: String,
}

/// Everything the running-quiz screen draws.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveVm {
    /// 1-based number of the question on screen; changes when a new one is drawn.
    pub question_number: usize,
    pub question_label: String,
    pub step_label: String,
    pub multiple_choice: bool,
    pub choices: Vec<i64>,
    pub feedback: Option<FeedbackVm>,
    pub score: i64,
    pub timer_caption: &'static str,
    pub timer_label: String,
    pub progress_percent: f64,
    pub correct: usize,
    pub wrong: usize,
}

#[must_use]
pub fn map_active(session: &QuizSession) -> ActiveVm {
    let progress = session.progress();
    let question_number = if session.feedback().is_some() {
        progress.answered
    } else {
        progress.answered + 1
    };
    let config = session.config();

    let step_label = match config.mode() {
        QuizMode::Count => format!("Question {question_number} of {}", config.limit()),
        QuizMode::Timed => format!("Question {question_number}"),
    };
    let timer_caption = match config.mode() {
        QuizMode::Count => "Elapsed",
        QuizMode::Timed => "Time left",
    };

    let feedback = session.feedback().map(|feedback| {
        let last_score = session.records().last().map_or(0, |r| r.score());
        let pair = session.question();
        match feedback {
            Feedback::Correct => FeedbackVm {
                correct: true,
                message: format!("Correct! +{last_score}"),
            },
            Feedback::Wrong => FeedbackVm {
                correct: false,
                message: format!("Not quite. {pair} = {}", pair.product()),
            },
        }
    });

    ActiveVm {
        question_number,
        question_label: format!("{} = ?", session.question()),
        step_label,
        multiple_choice: config.answer_mode() == AnswerMode::MultipleChoice,
        choices: session.choices().to_vec(),
        feedback,
        score: progress.running_score,
        timer_caption,
        timer_label: format_clock(progress.clock_secs),
        progress_percent: progress.percent,
        correct: progress.correct,
        wrong: progress.wrong,
    }
}
