use jobwatch_core::{Effect, Msg, PollSeq};
use jobwatch_engine::{EngineEvent, PollerHandle};
use jobwatch_logging::{watch_error, watch_trace};

/// Something that can start a poll; the live implementation is the engine.
pub trait PollDispatch {
    fn dispatch(&self, seq: PollSeq);
}

impl PollDispatch for PollerHandle {
    fn dispatch(&self, seq: PollSeq) {
        self.poll(seq);
    }
}

pub struct EffectRunner<'a, P: PollDispatch> {
    poller: &'a P,
}

impl<'a, P: PollDispatch> EffectRunner<'a, P> {
    pub fn new(poller: &'a P) -> Self {
        Self { poller }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::IssuePoll { seq } => {
                    watch_trace!("IssuePoll seq={}", seq);
                    self.poller.dispatch(seq);
                }
                Effect::ReportFailure { seq, failure } => {
                    watch_error!("Error while getting statuses (poll #{}): {}", seq, failure);
                }
            }
        }
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Tick => Msg::Tick,
        EngineEvent::PollCompleted { seq, result } => match result {
            Ok(statuses) => Msg::PollSucceeded { seq, statuses },
            Err(err) => Msg::PollFailed {
                seq,
                failure: err.into(),
            },
        },
    }
}
