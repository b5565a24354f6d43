use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::time::fixed_clock;
use services::{Clock, HistoryService};

use super::quiz::QuizTestHandles;
use crate::context::{UiApp, build_app_context};
use crate::views::{HistoryPanel, QuizView, ResultsView};
use crate::vm::{HistoryItemVm, ResultsVm};

#[derive(Clone)]
struct TestApp {
    history: HistoryService,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        fixed_clock()
    }

    fn history(&self) -> HistoryService {
        self.history.clone()
    }
}

#[derive(Props, Clone)]
struct QuizHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for QuizHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizHarnessRoot(props: QuizHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { QuizView {} }
}

#[derive(Props, Clone, PartialEq)]
struct ResultsHarnessProps {
    vm: ResultsVm,
}

#[component]
fn ResultsHarnessRoot(props: ResultsHarnessProps) -> Element {
    rsx! {
        ResultsView { vm: props.vm.clone(), on_restart: move |_| {} }
    }
}

#[derive(Props, Clone, PartialEq)]
struct HistoryHarnessProps {
    items: Vec<HistoryItemVm>,
}

#[component]
fn HistoryHarnessRoot(props: HistoryHarnessProps) -> Element {
    rsx! {
        HistoryPanel { items: props.items.clone(), on_clear: move |_| {} }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Keep running spawned tasks until `duration` has passed.
    pub async fn drive_for(&mut self, duration: Duration) {
        let deadline = tokio::time::Instant::now() + duration;
        while tokio::time::Instant::now() < deadline
            && tokio::time::timeout_at(deadline, self.dom.wait_for_work())
                .await
                .is_ok()
        {
            self.dom.render_immediate(&mut NoOpMutations);
        }
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn quiz_harness(history: HistoryService) -> ViewHarness {
    let app = Arc::new(TestApp { history });
    let handles = QuizTestHandles::default();
    ViewHarness {
        dom: VirtualDom::new_with_props(
            QuizHarnessRoot,
            QuizHarnessProps {
                app,
                handles: handles.clone(),
            },
        ),
        quiz_handles: Some(handles),
    }
}

pub fn results_harness(vm: ResultsVm) -> ViewHarness {
    ViewHarness {
        dom: VirtualDom::new_with_props(ResultsHarnessRoot, ResultsHarnessProps { vm }),
        quiz_handles: None,
    }
}

pub fn history_harness(items: Vec<HistoryItemVm>) -> ViewHarness {
    ViewHarness {
        dom: VirtualDom::new_with_props(HistoryHarnessRoot, HistoryHarnessProps { items }),
        quiz_handles: None,
    }
}
