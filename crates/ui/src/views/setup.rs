use dioxus::prelude::*;

use quiz_core::model::{AnswerMode, MAX_FACTOR, MIN_FACTOR, QuizConfigDraft, QuizMode};

use crate::views::HistoryPanel;
use crate::vm::HistoryItemVm;

fn toggle_class(active: bool) -> &'static str {
    if active { "toggle active" } else { "toggle" }
}

fn number_class(selected: bool) -> &'static str {
    if selected { "number selected" } else { "number" }
}

#[component]
pub fn SetupView(
    initial: QuizConfigDraft,
    history: Vec<HistoryItemVm>,
    on_start: EventHandler<QuizConfigDraft>,
    on_clear_history: EventHandler<bool>,
) -> Element {
    let mut draft = use_signal(move || initial);
    let current = draft();
    let bounds = current.mode.limit_bounds();
    let limit_label = match current.mode {
        QuizMode::Count => format!("Number of questions: {}", current.limit),
        QuizMode::Timed => format!("Time limit: {} seconds", current.limit),
    };
    let can_start = current.can_start();

    rsx! {
        div { class: "page setup",
            h1 { "Multiplication Quiz" }

            section { class: "setup-section",
                h2 { "How do you want to answer?" }
                div { class: "toggle-group",
                    button {
                        class: toggle_class(current.answer_mode == AnswerMode::Typing),
                        onclick: move |_| {
                            draft.write().answer_mode = AnswerMode::Typing;
                        },
                        "Type the answer"
                    }
                    button {
                        class: toggle_class(current.answer_mode == AnswerMode::MultipleChoice),
                        onclick: move |_| {
                            draft.write().answer_mode = AnswerMode::MultipleChoice;
                        },
                        "Multiple choice"
                    }
                }
            }

            section { class: "setup-section",
                h2 { "Quiz mode" }
                div { class: "toggle-group",
                    button {
                        class: toggle_class(current.mode == QuizMode::Count),
                        onclick: move |_| draft.write().set_mode(QuizMode::Count),
                        "Number of questions"
                    }
                    button {
                        class: toggle_class(current.mode == QuizMode::Timed),
                        onclick: move |_| draft.write().set_mode(QuizMode::Timed),
                        "Against the clock"
                    }
                }
                label { class: "limit-label", "{limit_label}" }
                input {
                    class: "limit-slider",
                    r#type: "range",
                    min: "{bounds.min}",
                    max: "{bounds.max}",
                    step: "{bounds.step}",
                    value: "{current.limit}",
                    oninput: move |evt: FormEvent| {
                        if let Ok(value) = evt.value().parse::<u32>() {
                            draft.write().set_limit(value);
                        }
                    },
                }
            }

            section { class: "setup-section",
                h2 { "Which times tables?" }
                div { class: "number-grid",
                    for number in MIN_FACTOR..=MAX_FACTOR {
                        button {
                            key: "{number}",
                            class: number_class(current.is_selected(number)),
                            onclick: move |_| draft.write().toggle_number(number),
                            "{number}"
                        }
                    }
                }
                div { class: "number-actions",
                    button { onclick: move |_| draft.write().select_all(), "Select all" }
                    button { onclick: move |_| draft.write().clear_numbers(), "Clear" }
                }
            }

            button {
                class: "primary start",
                disabled: !can_start,
                onclick: move |_| on_start.call(draft()),
                "Start quiz"
            }
            if !can_start {
                p { class: "hint", "Pick at least one number to start." }
            }

            HistoryPanel { items: history, on_clear: on_clear_history }
        }
    }
}
