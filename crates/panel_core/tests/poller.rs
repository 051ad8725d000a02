use std::time::Duration;

use panel_core::{
    update, AppState, Effect, ErrorKind, Msg, PollErrorPolicy, PollerPhase, ProgressSnapshot,
    RequestError, ResultItem, ResultsView, START_SENTINEL,
};
use pretty_assertions::assert_eq;

const INTERVAL: Duration = Duration::from_millis(1000);

fn init_logging() {
    panel_logging::initialize_for_tests();
}

fn polling(policy: PollErrorPolicy) -> (AppState, u64) {
    let state = AppState::with_poll_settings(INTERVAL, policy);
    let (state, _) = update(state, Msg::StartClicked);
    let (state, effects) =
        update(state, Msg::StartAcknowledged(Ok(START_SENTINEL.to_string())));
    let generation = match effects.as_slice() {
        [Effect::FetchProgress { generation }] => *generation,
        other => panic!("expected an immediate progress fetch, got {other:?}"),
    };
    (state, generation)
}

fn snapshot(is_processing: bool, processed: u64) -> ProgressSnapshot {
    ProgressSnapshot {
        overall_progress: Some(processed as f64 * 10.0),
        total_processed: Some(processed),
        successful: Some(processed),
        failed: Some(0),
        remaining: Some(10 - processed),
        total: Some(10),
        is_processing,
    }
}

fn item(title: &str) -> ResultItem {
    ResultItem {
        title: title.to_string(),
        location: "Austin, TX".to_string(),
        snippet: "Commercial cleaning".to_string(),
        url: format!("https://{title}.example.com/"),
    }
}

#[test]
fn two_busy_snapshots_then_done_polls_twice_and_fetches_results_once() {
    init_logging();
    let (mut state, generation) = polling(PollErrorPolicy::ContinueAndLog);
    let mut all_effects = Vec::new();

    for (busy, processed) in [(true, 3), (true, 6), (false, 10)] {
        let (next, effects) = update(
            state,
            Msg::ProgressReceived {
                generation,
                result: Ok(snapshot(busy, processed)),
            },
        );
        state = next;
        all_effects.extend(effects);
    }

    let polls = all_effects
        .iter()
        .filter(|e| matches!(e, Effect::SchedulePoll { .. }))
        .count();
    let results = all_effects
        .iter()
        .filter(|e| matches!(e, Effect::FetchResults { .. }))
        .count();
    assert_eq!(polls, 2);
    assert_eq!(results, 1);
    assert_eq!(
        all_effects.last(),
        Some(&Effect::FetchResults { generation })
    );
    assert_eq!(
        all_effects[0],
        Effect::SchedulePoll {
            generation,
            after: INTERVAL
        }
    );
    assert_eq!(state.view().poller, PollerPhase::Stopped);
    assert!(!state.is_processing());
    assert_eq!(state.view().progress.total_processed, 10);

    let (state, effects) = update(
        state,
        Msg::ResultsReceived {
            generation,
            result: Ok(vec![item("a"), item("b")]),
        },
    );
    assert!(effects.is_empty());
    match state.view().results {
        ResultsView::Items(rows) => {
            let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
            assert_eq!(titles, vec!["a", "b"]);
        }
        other => panic!("expected results, got {other:?}"),
    }
}

#[test]
fn initial_check_runs_after_states_load() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Initialize);
    let (state, effects) = update(state, Msg::StatesLoaded(Ok(vec!["Ohio".into()])));
    assert_eq!(effects, vec![Effect::FetchProgress { generation: 1 }]);

    // A job started before the panel opened keeps the panel busy.
    let (state, effects) = update(
        state,
        Msg::ProgressReceived {
            generation: 1,
            result: Ok(snapshot(true, 2)),
        },
    );
    assert!(matches!(effects.as_slice(), [Effect::SchedulePoll { .. }]));
    assert!(state.view().controls.stop_visible);
}

#[test]
fn progress_from_before_stop_is_discarded() {
    init_logging();
    let (state, generation) = polling(PollErrorPolicy::ContinueAndLog);
    let (state, _) = update(state, Msg::StopClicked);

    let (mut state, effects) = update(
        state,
        Msg::ProgressReceived {
            generation,
            result: Ok(snapshot(false, 10)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().progress.total_processed, 0);
    assert_eq!(state.view().poller, PollerPhase::Idle);

    state.consume_dirty();
    let (mut state, effects) = update(
        state,
        Msg::ResultsReceived {
            generation,
            result: Ok(vec![item("late")]),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn continue_policy_keeps_polling_after_error() {
    init_logging();
    let (state, generation) = polling(PollErrorPolicy::ContinueAndLog);
    let (state, effects) = update(
        state,
        Msg::ProgressReceived {
            generation,
            result: Err(RequestError::new(ErrorKind::Network, "reset by peer")),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            generation,
            after: INTERVAL
        }]
    );
    assert_eq!(state.view().poller, PollerPhase::Polling);
    assert!(state.is_processing());
    assert!(state.view().notice.is_some());
}

#[test]
fn retry_notice_clears_once_progress_arrives() {
    init_logging();
    let (state, generation) = polling(PollErrorPolicy::ContinueAndLog);
    let (state, _) = update(
        state,
        Msg::ProgressReceived {
            generation,
            result: Err(RequestError::new(ErrorKind::Network, "reset by peer")),
        },
    );
    assert!(state.view().notice.is_some());

    let (state, _) = update(
        state,
        Msg::ProgressReceived {
            generation,
            result: Ok(snapshot(true, 4)),
        },
    );
    assert_eq!(state.view().notice, None);
    assert_eq!(state.view().progress.total_processed, 4);
}

#[test]
fn halt_policy_stops_polling_after_error() {
    init_logging();
    let (state, generation) = polling(PollErrorPolicy::Halt);
    let (state, effects) = update(
        state,
        Msg::ProgressReceived {
            generation,
            result: Err(RequestError::new(ErrorKind::Parse, "expected value")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().poller, PollerPhase::Stopped);
    assert!(!state.is_processing());
    assert_eq!(
        state.view().results,
        ResultsView::Error {
            message: "Progress check failed: expected value".into()
        }
    );
}

#[test]
fn refresh_results_uses_current_generation() {
    init_logging();
    let (state, generation) = polling(PollErrorPolicy::ContinueAndLog);
    let (_state, effects) = update(state, Msg::RefreshResultsClicked);
    assert_eq!(effects, vec![Effect::FetchResults { generation }]);
}

#[test]
fn empty_results_render_placeholder() {
    init_logging();
    let (state, generation) = polling(PollErrorPolicy::ContinueAndLog);
    let (state, _) = update(
        state,
        Msg::ResultsReceived {
            generation,
            result: Ok(Vec::new()),
        },
    );
    assert!(matches!(
        state.view().results,
        ResultsView::Placeholder { .. }
    ));
}
