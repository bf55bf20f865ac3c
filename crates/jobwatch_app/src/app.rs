use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use jobwatch_core::{update, AppState};
use jobwatch_engine::{redact_endpoint, EngineEvent, PollerHandle, ReqwestStatusFetcher};
use jobwatch_logging::watch_info;

use crate::config::WatchConfig;
use crate::effects::{event_to_msg, EffectRunner, PollDispatch};
use crate::output::Publisher;

/// Where the loop reads engine events from; the live implementation is the
/// engine.
pub trait EventSource {
    /// Block for the next event. `None` ends the loop.
    fn next_event(&self) -> Option<EngineEvent>;
    fn shutdown(&self);
}

impl EventSource for PollerHandle {
    fn next_event(&self) -> Option<EngineEvent> {
        self.recv()
    }

    fn shutdown(&self) {
        self.stop();
    }
}

pub struct RunSummary {
    pub state: AppState,
    pub renders: u64,
}

/// Poll until the engine stops or `max_polls` cycles have completed.
pub fn run(config: WatchConfig) -> anyhow::Result<()> {
    let fetcher = ReqwestStatusFetcher::new(config.fetch_settings())
        .with_context(|| format!("status endpoint {:?}", redact_endpoint(&config.endpoint)))?;
    watch_info!(
        "Watching {} every {} ms",
        fetcher.endpoint(),
        config.interval_ms
    );

    let poller = PollerHandle::start(config.interval(), Arc::new(fetcher))
        .context("failed to start poller")?;
    let publisher = Publisher::new(&config);

    let summary = drive(&poller, &config, &publisher);
    watch_info!(
        "Poller finished after {} polls, {} renders",
        summary.state.completed_polls(),
        summary.renders
    );
    Ok(())
}

/// The event loop: engine event → `update` → effects → publish when dirty.
pub fn drive<S>(source: &S, config: &WatchConfig, publisher: &Publisher) -> RunSummary
where
    S: EventSource + PollDispatch,
{
    let runner = EffectRunner::new(source);
    let mut state = AppState::with_settings(config.poll_settings());
    let mut renders = 0;

    while let Some(event) = source.next_event() {
        let (next, effects) = update(state, event_to_msg(event));
        state = next;
        runner.run(effects);

        if state.consume_dirty() {
            publisher.publish(&state, Local::now());
            renders += 1;
        }

        if config
            .max_polls
            .is_some_and(|max| state.completed_polls() >= max)
        {
            watch_info!("Completed {} polls, stopping", state.completed_polls());
            source.shutdown();
            break;
        }
    }

    RunSummary { state, renders }
}
