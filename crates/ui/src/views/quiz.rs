#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;
use tracing::warn;

use quiz_core::model::{QuizConfigDraft, QuizResult};
use services::{
    ControllerError, ControllerStep, FEEDBACK_DWELL, HistoryWrite, QuizController, QuizSession,
    Screen, SessionToken, SubmitOutcome, TICK_INTERVAL,
};

use crate::context::AppContext;
use crate::views::{
    ActiveView, ResultsView, SetupView, ViewError, ViewState, view_state_from_resource,
};
use crate::vm::{map_active, map_history, map_results};

/// Root of the quiz: loads history once, then hosts the three screens.
#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();

    let resource = use_resource(move || {
        let history = history.clone();
        async move { history.load().await.map_err(|_| ViewError::LoadFailed) }
    });
    let state = view_state_from_resource(resource);

    rsx! {
        match state {
            ViewState::Idle | ViewState::Loading => rsx! {
                p { class: "loading", "Loading..." }
            },
            ViewState::Ready(history) => rsx! {
                QuizScreens { history }
            },
            ViewState::Error(err) => rsx! {
                p { class: "error", "{err.message()}" }
            },
        }
    }
}

// Timer and dwell tasks are spawned from callbacks owned by this component so
// they outlive the screen that triggered them.
#[component]
fn QuizScreens(history: Vec<QuizResult>) -> Element {
    let ctx = use_context::<AppContext>();
    let mut controller =
        use_signal(move || QuizController::new(ctx.history(), ctx.clock(), history.clone()));
    let mut error = use_signal(|| None::<ViewError>);

    let on_start = use_callback(move |draft: QuizConfigDraft| {
        let started = controller.write().start(draft);
        match started {
            Ok(token) => {
                error.set(None);
                spawn_ticker(controller, error, token);
            }
            Err(err) => {
                warn!(error = %err, "quiz did not start");
                error.set(Some(ViewError::Unknown));
            }
        }
    });
    let on_submit = use_callback(move |raw: String| {
        let outcome = controller.write().submit(&raw);
        schedule_dwell(controller, error, &outcome);
    });
    let on_choose = use_callback(move |candidate: i64| {
        let outcome = controller.write().choose(candidate);
        schedule_dwell(controller, error, &outcome);
    });
    let on_exit = use_callback(move |()| {
        controller.write().cancel();
    });
    let on_restart = use_callback(move |()| {
        controller.write().restart();
    });
    let on_clear_history = use_callback(move |confirmed: bool| {
        let write = controller.write().clear_history(confirmed);
        if let Some(write) = write {
            spawn(persist(write, error));
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(QuizHandles {
                    controller,
                    start: on_start,
                    submit: on_submit,
                    exit: on_exit,
                });
            }
        }
    }

    let current_error = error();
    let guard = controller.read();
    let screen = match guard.screen() {
        Screen::Setup => {
            let initial = guard.setup_draft();
            let history = map_history(guard.history_newest_first());
            rsx! {
                SetupView { initial, history, on_start, on_clear_history }
            }
        }
        Screen::Active(session) => {
            let vm = map_active(session);
            rsx! {
                ActiveView { vm, on_submit, on_choose, on_exit }
            }
        }
        Screen::Results(result) => {
            let vm = map_results(result);
            rsx! {
                ResultsView { vm, on_restart }
            }
        }
    };
    drop(guard);

    rsx! {
        div { class: "quiz",
            if let Some(err) = current_error {
                p { class: "error", "{err.message()}" }
            }
            {screen}
        }
    }
}

fn spawn_ticker(
    mut controller: Signal<QuizController>,
    error: Signal<Option<ViewError>>,
    token: SessionToken,
) {
    spawn(async move {
        loop {
            tokio::time::sleep(TICK_INTERVAL).await;
            let step = controller.write().tick(token);
            if !follow_step(step, error).await {
                break;
            }
        }
    });
}

fn schedule_dwell(
    mut controller: Signal<QuizController>,
    error: Signal<Option<ViewError>>,
    outcome: &SubmitOutcome,
) {
    if !matches!(outcome, SubmitOutcome::Recorded { .. }) {
        return;
    }
    let Some(token) = controller.read().active_session().map(QuizSession::token) else {
        return;
    };
    spawn(async move {
        tokio::time::sleep(FEEDBACK_DWELL).await;
        let step = controller.write().finish_feedback(token);
        follow_step(step, error).await;
    });
}

/// Returns `true` while the session is still running.
async fn follow_step(
    step: Result<ControllerStep, ControllerError>,
    mut error: Signal<Option<ViewError>>,
) -> bool {
    match step {
        Ok(ControllerStep::Running) => true,
        Ok(ControllerStep::Stale) => false,
        Ok(ControllerStep::Completed(write)) => {
            persist(write, error).await;
            false
        }
        Err(err) => {
            warn!(error = %err, "quiz step failed");
            error.set(Some(ViewError::Unknown));
            false
        }
    }
}

async fn persist(write: HistoryWrite, mut error: Signal<Option<ViewError>>) {
    if write.apply().await.is_err() {
        error.set(Some(ViewError::SaveFailed));
    }
}

#[cfg(test)]
#[derive(Clone, Copy)]
pub(crate) struct QuizHandles {
    pub(crate) controller: Signal<QuizController>,
    pub(crate) start: Callback<QuizConfigDraft>,
    pub(crate) submit: Callback<String>,
    pub(crate) exit: Callback<()>,
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    handles: Rc<RefCell<Option<QuizHandles>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    fn register(&self, handles: QuizHandles) {
        *self.handles.borrow_mut() = Some(handles);
    }

    pub(crate) fn get(&self) -> QuizHandles {
        (*self.handles.borrow()).expect("quiz handles registered")
    }
}
