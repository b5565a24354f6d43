use dioxus::prelude::*;

use crate::vm::ResultsVm;

#[component]
pub fn ResultsView(vm: ResultsVm, on_restart: EventHandler<()>) -> Element {
    rsx! {
        div { class: "page results",
            if vm.celebrate {
                div { class: "celebration", "Great job! You got more than 70% right!" }
            }
            h1 { "Quiz complete" }
            p { class: "description", "{vm.description}" }

            div { class: "result-grid",
                Stat { label: "Total score", value: vm.total_score.to_string() }
                Stat { label: "Accuracy", value: format!("{}%", vm.accuracy) }
                Stat { label: "Questions answered", value: vm.total.to_string() }
                Stat { label: "Correct", value: vm.correct.to_string() }
                Stat { label: "Wrong", value: vm.wrong.to_string() }
                Stat { label: "Average time", value: format!("{} s", vm.average_secs) }
            }

            if !vm.missed.is_empty() {
                section { class: "missed",
                    h2 { "Practice these" }
                    ul {
                        for missed in vm.missed.iter() {
                            li { key: "{missed}", "{missed}" }
                        }
                    }
                }
            }

            button {
                class: "primary",
                onclick: move |_| on_restart.call(()),
                "Play again"
            }
        }
    }
}

#[component]
fn Stat(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "stat",
            span { class: "stat-value", "{value}" }
            span { class: "stat-label", "{label}" }
        }
    }
}
