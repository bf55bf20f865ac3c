//! Jobwatch engine: status fetching, poll scheduling and snapshot output.
mod fetch;
mod persist;
mod poller;
mod types;

pub use fetch::{
    redact_endpoint, FetchSettings, ReqwestStatusFetcher, StatusFetcher, DEFAULT_STATUS_ENDPOINT,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::{PollerHandle, DEFAULT_POLL_INTERVAL};
pub use types::{EngineEvent, FailureKind, FetchError};
