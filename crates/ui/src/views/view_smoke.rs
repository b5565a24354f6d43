use std::time::Duration;

use quiz_core::model::{
    AnswerMode, FactorPair, QuestionRecord, QuizConfig, QuizConfigDraft, QuizMode, QuizResult,
};
use quiz_core::time::fixed_now;
use services::{FEEDBACK_DWELL, HistoryService, QuizSession, TICK_INTERVAL};

use super::test_harness::{history_harness, quiz_harness, results_harness};
use crate::vm::{map_history, map_results};

fn result_with(mode: QuizMode, limit: u32, correct: usize, wrong: usize) -> QuizResult {
    let config =
        QuizConfig::from_persisted(mode, AnswerMode::Typing, limit, vec![6]).unwrap();
    let pair = FactorPair::new(6, 7).unwrap();
    let mut records = Vec::new();
    records.extend((0..correct).map(|_| QuestionRecord::answered(pair, 42, 1_500)));
    records.extend((0..wrong).map(|_| QuestionRecord::answered(pair, 41, 1_500)));
    QuizResult::from_records(config, records, fixed_now()).unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_renders_stats_and_celebration() {
    let result = result_with(QuizMode::Count, 5, 4, 1);
    let mut harness = results_harness(map_results(&result));

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Great job"), "missing celebration in {html}");
    assert!(html.contains("80%"), "missing accuracy in {html}");
    assert!(html.contains("Questions answered"), "missing question count in {html}");
    assert!(html.contains("550"), "missing total score in {html}");
    assert!(html.contains("1.5 s"), "missing average time in {html}");
    assert!(html.contains("6 × 7 = 42"), "missing missed pair in {html}");
    assert!(html.contains("Play again"), "missing restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_smoke_skips_celebration_at_seventy_percent() {
    let result = result_with(QuizMode::Count, 10, 7, 3);
    let mut harness = results_harness(map_results(&result));

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("70%"), "missing accuracy in {html}");
    assert!(!html.contains("Great job"), "unexpected celebration in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_panel_smoke_lists_newest_first() {
    let older = result_with(QuizMode::Count, 5, 5, 0);
    let newer = result_with(QuizMode::Timed, 60, 2, 2);
    let history = vec![older, newer];
    let mut harness = history_harness(map_history(history.iter().rev()));

    harness.rebuild();
    let html = harness.render();

    let newer_at = html.find("60 seconds").expect("newer entry");
    let older_at = html.find("5 questions").expect("older entry");
    assert!(newer_at < older_at, "history not newest first: {html}");
    assert!(html.contains("Clear history"), "missing clear action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_panel_smoke_renders_empty_state() {
    let mut harness = history_harness(Vec::new());

    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("No quizzes yet."), "missing empty state in {html}");
    assert!(!html.contains("Clear history"), "unexpected clear action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_loads_history_into_setup() {
    let history = HistoryService::in_memory();
    history
        .save(&[result_with(QuizMode::Count, 5, 3, 2)])
        .await
        .expect("save history");
    let mut harness = quiz_harness(history);

    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Multiplication Quiz"), "missing setup in {html}");
    assert!(html.contains("Start quiz"), "missing start button in {html}");
    assert!(html.contains("3/5 correct (60%)"), "missing history row in {html}");
}

fn draft(mode: QuizMode, limit: u32, number: u8) -> QuizConfigDraft {
    QuizConfigDraft {
        mode,
        answer_mode: AnswerMode::Typing,
        limit,
        selected_numbers: vec![number],
    }
}

const SLACK: Duration = Duration::from_millis(300);

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_cancelled_timer_leaves_the_next_run_alone() {
    let history = HistoryService::in_memory();
    let mut harness = quiz_harness(history.clone());
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let quiz = harness.quiz_handles.clone().expect("quiz harness").get();

    let timed = draft(QuizMode::Timed, 30, 5);
    harness.dom.in_runtime(|| quiz.start.call(timed.clone()));
    harness.dom.in_runtime(|| quiz.exit.call(()));
    harness.dom.in_runtime(|| quiz.start.call(timed));
    harness.drive_for(TICK_INTERVAL + SLACK).await;

    let elapsed = harness.dom.in_runtime(|| {
        quiz.controller
            .peek()
            .active_session()
            .map(QuizSession::elapsed_secs)
    });
    assert_eq!(elapsed, Some(1));

    harness.dom.in_runtime(|| quiz.exit.call(()));
    harness.drive_for(TICK_INTERVAL + SLACK).await;
    let html = harness.render();

    assert!(html.contains("Start quiz"), "expected setup after exit: {html}");
    assert!(html.contains("Time limit: 30 seconds"), "setup not pre-filled: {html}");
    assert!(history.load().await.unwrap().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_saves_a_finished_run() {
    let history = HistoryService::in_memory();
    let mut harness = quiz_harness(history.clone());
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let quiz = harness.quiz_handles.clone().expect("quiz harness").get();

    harness
        .dom
        .in_runtime(|| quiz.start.call(draft(QuizMode::Count, 5, 3)));
    for _ in 0..5 {
        let product = harness
            .dom
            .in_runtime(|| {
                quiz.controller
                    .peek()
                    .active_session()
                    .map(|session| session.question().product())
            })
            .expect("run still active");
        harness
            .dom
            .in_runtime(|| quiz.submit.call(product.to_string()));
        harness.drive_for(FEEDBACK_DWELL + SLACK).await;
    }
    let html = harness.render();

    assert!(html.contains("Quiz complete"), "missing results in {html}");
    let stored = history.load().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].correct_count(), 5);
}
