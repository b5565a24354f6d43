use dioxus::prelude::*;

use crate::vm::HistoryItemVm;

/// Past results, newest first, with a confirmed clear action.
#[component]
pub fn HistoryPanel(items: Vec<HistoryItemVm>, on_clear: EventHandler<bool>) -> Element {
    let mut confirming = use_signal(|| false);
    let has_items = !items.is_empty();

    rsx! {
        section { class: "history",
            div { class: "history-header",
                h2 { "Past quizzes" }
                if has_items && !confirming() {
                    button {
                        class: "link danger",
                        onclick: move |_| confirming.set(true),
                        "Clear history"
                    }
                }
            }
            if confirming() {
                div { class: "confirm",
                    p { "Delete all past results? This cannot be undone." }
                    button {
                        class: "danger",
                        onclick: move |_| {
                            confirming.set(false);
                            on_clear.call(true);
                        },
                        "Yes, clear"
                    }
                    button {
                        onclick: move |_| {
                            confirming.set(false);
                            on_clear.call(false);
                        },
                        "Keep"
                    }
                }
            }
            if has_items {
                ul { class: "history-list",
                    for item in items.iter() {
                        HistoryRow { key: "{item.id}", item: item.clone() }
                    }
                }
            } else {
                p { class: "empty", "No quizzes yet." }
            }
        }
    }
}

#[component]
fn HistoryRow(item: HistoryItemVm) -> Element {
    rsx! {
        li { class: "history-item",
            div { class: "history-meta",
                span { class: "history-date", "{item.date}" }
                span { class: "history-config", "{item.description}" }
                span { class: "history-numbers", "Tables: {item.numbers}" }
            }
            div { class: "history-score",
                span { class: "history-points", "{item.score} pts" }
                span { "{item.correct}/{item.total} correct ({item.accuracy}%)" }
            }
        }
    }
}
