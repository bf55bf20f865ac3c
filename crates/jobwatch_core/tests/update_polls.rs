use std::sync::Once;

use jobwatch_core::{
    update, AppState, Effect, Msg, PollFailure, PollSeq, PollSettings, StatusMap, TableRow,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobwatch_logging::initialize_for_tests);
}

fn statuses(pairs: &[(&str, &str)]) -> StatusMap {
    pairs.iter().copied().collect()
}

fn tick(state: AppState) -> (AppState, PollSeq) {
    let (state, effects) = update(state, Msg::Tick);
    match effects.as_slice() {
        [Effect::IssuePoll { seq }] => (state, *seq),
        other => panic!("expected a single IssuePoll, got {other:?}"),
    }
}

fn shown(state: &AppState) -> Vec<(String, String)> {
    state
        .table()
        .rows()
        .iter()
        .map(|TableRow { id, status }| (id.clone(), status.clone()))
        .collect()
}

#[test]
fn ticks_issue_increasing_sequence_numbers() {
    init_logging();
    let (state, first) = tick(AppState::new());
    let (state, second) = tick(state);
    let (state, third) = tick(state);

    assert!(first < second && second < third);
    assert_eq!(state.view().in_flight, 3);
}

#[test]
fn successful_poll_renders_the_status_map() {
    init_logging();
    let (state, seq) = tick(AppState::new());
    let (mut state, effects) = update(
        state,
        Msg::PollSucceeded {
            seq,
            statuses: statuses(&[("job1", "running"), ("job2", "failed")]),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        shown(&state),
        vec![
            ("job1".to_string(), "running".to_string()),
            ("job2".to_string(), "failed".to_string()),
        ]
    );
    let view = state.view();
    assert_eq!(view.shown_seq, Some(seq));
    assert_eq!(view.in_flight, 0);
    assert_eq!(state.completed_polls(), 1);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn http_status_failure_is_silent_and_keeps_the_table() {
    init_logging();
    let (state, seq) = tick(AppState::new());
    let (mut state, _) = update(
        state,
        Msg::PollSucceeded {
            seq,
            statuses: statuses(&[("job1", "running")]),
        },
    );
    assert!(state.consume_dirty());

    let (state, seq) = tick(state);
    let (mut state, effects) = update(
        state,
        Msg::PollFailed {
            seq,
            failure: PollFailure::HttpStatus(500),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        shown(&state),
        vec![("job1".to_string(), "running".to_string())]
    );
    assert!(!state.consume_dirty());
}

#[test]
fn http_status_failure_reported_when_enabled() {
    init_logging();
    let settings = PollSettings {
        report_http_status: true,
        ..PollSettings::default()
    };
    let (state, seq) = tick(AppState::with_settings(settings));
    let (_state, effects) = update(
        state,
        Msg::PollFailed {
            seq,
            failure: PollFailure::HttpStatus(503),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::ReportFailure {
            seq,
            failure: PollFailure::HttpStatus(503),
        }]
    );
}

#[test]
fn transport_failure_reports_exactly_once_and_keeps_the_table() {
    init_logging();
    let (state, seq) = tick(AppState::new());
    let (mut state, _) = update(
        state,
        Msg::PollSucceeded {
            seq,
            statuses: statuses(&[("job1", "done")]),
        },
    );
    assert!(state.consume_dirty());

    let (state, seq) = tick(state);
    let failure = PollFailure::Transport {
        message: "connection refused".to_string(),
    };
    let (mut state, effects) = update(
        state,
        Msg::PollFailed {
            seq,
            failure: failure.clone(),
        },
    );

    assert_eq!(effects, vec![Effect::ReportFailure { seq, failure }]);
    assert_eq!(shown(&state), vec![("job1".to_string(), "done".to_string())]);
    assert!(!state.consume_dirty());
}

#[test]
fn decode_failure_is_reported_distinctly() {
    init_logging();
    let (state, seq) = tick(AppState::new());
    let (state, effects) = update(
        state,
        Msg::PollFailed {
            seq,
            failure: PollFailure::Decode {
                message: "expected value".to_string(),
            },
        },
    );

    assert!(matches!(
        effects.as_slice(),
        [Effect::ReportFailure {
            failure: PollFailure::Decode { .. },
            ..
        }]
    ));
    assert!(state.table().is_empty());
}

#[test]
fn late_response_from_an_older_poll_is_discarded() {
    init_logging();
    let (state, older) = tick(AppState::new());
    let (state, newer) = tick(state);

    let (state, _) = update(
        state,
        Msg::PollSucceeded {
            seq: newer,
            statuses: statuses(&[("job1", "done")]),
        },
    );
    let (state, effects) = update(
        state,
        Msg::PollSucceeded {
            seq: older,
            statuses: statuses(&[("job1", "running")]),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(shown(&state), vec![("job1".to_string(), "done".to_string())]);
    let view = state.view();
    assert_eq!(view.shown_seq, Some(newer));
    assert_eq!(view.stale_discarded, 1);
    assert_eq!(view.in_flight, 0);
    assert_eq!(state.completed_polls(), 2);
}

#[test]
fn in_order_responses_each_render() {
    init_logging();
    let (state, first) = tick(AppState::new());
    let (state, second) = tick(state);

    let (state, _) = update(
        state,
        Msg::PollSucceeded {
            seq: first,
            statuses: statuses(&[("job1", "running")]),
        },
    );
    let (state, _) = update(
        state,
        Msg::PollSucceeded {
            seq: second,
            statuses: statuses(&[("job2", "queued")]),
        },
    );

    assert_eq!(shown(&state), vec![("job2".to_string(), "queued".to_string())]);
    assert_eq!(state.view().stale_discarded, 0);
}

#[test]
fn overlap_allowed_by_default() {
    init_logging();
    let (state, _) = tick(AppState::new());
    let (_state, effects) = update(state, Msg::Tick);
    assert_eq!(effects.len(), 1);
}

#[test]
fn tick_skipped_while_a_poll_is_outstanding_when_configured() {
    init_logging();
    let settings = PollSettings {
        skip_when_in_flight: true,
        ..PollSettings::default()
    };
    let (state, seq) = tick(AppState::with_settings(settings));

    let (state, effects) = update(state, Msg::Tick);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::PollFailed {
            seq,
            failure: PollFailure::Timeout,
        },
    );
    let (_state, next) = tick(state);
    assert!(next > seq);
}
