use dioxus::prelude::*;

use crate::vm::ActiveVm;

fn feedback_class(correct: bool) -> &'static str {
    if correct { "feedback correct" } else { "feedback wrong" }
}

#[component]
pub fn ActiveView(
    vm: ActiveVm,
    on_submit: EventHandler<String>,
    on_choose: EventHandler<i64>,
    on_exit: EventHandler<()>,
) -> Element {
    let mut answer = use_signal(String::new);
    let in_feedback = vm.feedback.is_some();
    let progress_style = format!("width: {:.0}%", vm.progress_percent);

    let mut submit = move || {
        on_submit.call(answer());
        answer.set(String::new());
    };

    rsx! {
        div { class: "page active",
            header { class: "quiz-header",
                button { class: "exit", onclick: move |_| on_exit.call(()), "Exit" }
                span { class: "step", "{vm.step_label}" }
                span { class: "timer", "{vm.timer_caption}: {vm.timer_label}" }
            }
            div { class: "progress",
                div { class: "progress-bar", style: "{progress_style}" }
            }
            div { class: "stats",
                span { class: "score", "Score: {vm.score}" }
                span { class: "correct-count", "Correct: {vm.correct}" }
                span { class: "wrong-count", "Wrong: {vm.wrong}" }
            }

            div { class: "question",
                p { class: "question-text", "{vm.question_label}" }
                if vm.multiple_choice {
                    div { class: "choices",
                        for choice in vm.choices.iter().copied() {
                            button {
                                key: "{choice}",
                                class: "choice",
                                disabled: in_feedback,
                                onclick: move |_| on_choose.call(choice),
                                "{choice}"
                            }
                        }
                    }
                } else {
                    div { class: "answer-row",
                        input {
                            class: "answer-input",
                            r#type: "text",
                            inputmode: "numeric",
                            autofocus: true,
                            disabled: in_feedback,
                            value: "{answer}",
                            oninput: move |evt: FormEvent| answer.set(evt.value()),
                            onkeydown: move |evt: KeyboardEvent| {
                                if evt.key() == Key::Enter {
                                    submit();
                                }
                            },
                        }
                        button {
                            class: "primary",
                            disabled: in_feedback,
                            onclick: move |_| submit(),
                            "Check"
                        }
                    }
                }
                if let Some(feedback) = vm.feedback.as_ref() {
                    div { class: feedback_class(feedback.correct), "{feedback.message}" }
                }
            }
        }
    }
}
