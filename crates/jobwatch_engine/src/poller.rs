use std::io;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use jobwatch_core::PollSeq;
use jobwatch_logging::{watch_debug, watch_info};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::fetch::StatusFetcher;
use crate::EngineEvent;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

enum PollerCommand {
    Poll { seq: PollSeq },
    Shutdown,
}

/// Owns the background runtime that drives the repeating timer and the
/// status fetches. Events are read with [`PollerHandle::recv`] and friends.
pub struct PollerHandle {
    cmd_tx: mpsc::Sender<PollerCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Start the timer. The first [`EngineEvent::Tick`] is emitted immediately.
    pub fn start(interval: Duration, fetcher: Arc<dyn StatusFetcher>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("jobwatch-poller")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let interval = interval.max(Duration::from_millis(1));

        runtime.spawn(run_timer(interval, event_tx.clone(), cancel.clone()));
        watch_info!("Poller started, interval {:?}", interval);

        let worker_cancel = cancel.clone();
        let worker = thread::Builder::new()
            .name("jobwatch-dispatch".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        PollerCommand::Poll { seq } => {
                            runtime.spawn(run_poll(
                                seq,
                                fetcher.clone(),
                                event_tx.clone(),
                                worker_cancel.clone(),
                            ));
                        }
                        PollerCommand::Shutdown => break,
                    }
                }
                worker_cancel.cancel();
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            cancel,
            worker: Some(worker),
        })
    }

    /// Dispatch one fetch. Fetches are not serialized: several may be in
    /// flight and complete in any order.
    pub fn poll(&self, seq: PollSeq) {
        if self.cancel.is_cancelled() {
            return;
        }
        let _ = self.cmd_tx.send(PollerCommand::Poll { seq });
    }

    /// Stop the timer and abandon in-flight fetches. Idempotent.
    pub fn stop(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        let _ = self.cmd_tx.send(PollerCommand::Shutdown);
        watch_info!("Poller stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Block until the next event. `None` once the poller has stopped and
    /// every pending event was read.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

async fn run_timer(
    period: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if event_tx.send(EngineEvent::Tick).is_err() {
                    break;
                }
            }
        }
    }
}

async fn run_poll(
    seq: PollSeq,
    fetcher: Arc<dyn StatusFetcher>,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => {
            watch_debug!("Poll #{} abandoned", seq);
        }
        result = fetcher.fetch_statuses() => {
            let _ = event_tx.send(EngineEvent::PollCompleted { seq, result });
        }
    }
}
