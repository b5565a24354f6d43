mod config;
mod ids;
mod question;
mod result;

pub use config::{
    AnswerMode, LimitBounds, MAX_FACTOR, MIN_FACTOR, QuizConfig, QuizConfigDraft, QuizConfigError,
    QuizMode,
};
pub use ids::{ParseIdError, QuizResultId};
pub use question::{FactorPair, QuestionError, QuestionRecord};
pub use result::{QuizResult, QuizResultError, format_display_date};
