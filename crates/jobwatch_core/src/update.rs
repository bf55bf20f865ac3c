use crate::{AppState, Effect, Msg, PollFailure, PollSettings};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Tick => match state.begin_poll() {
            Some(seq) => vec![Effect::IssuePoll { seq }],
            None => Vec::new(),
        },
        Msg::PollSucceeded { seq, statuses } => {
            state.finish_poll(seq);
            state.apply_statuses(seq, &statuses);
            Vec::new()
        }
        Msg::PollFailed { seq, failure } => {
            state.finish_poll(seq);
            if should_report(state.settings(), &failure) {
                vec![Effect::ReportFailure { seq, failure }]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn should_report(settings: PollSettings, failure: &PollFailure) -> bool {
    match failure {
        PollFailure::HttpStatus(_) => settings.report_http_status,
        PollFailure::Transport { .. } | PollFailure::Timeout | PollFailure::Decode { .. } => true,
    }
}
