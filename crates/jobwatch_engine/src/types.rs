use std::fmt;

use jobwatch_core::{PollFailure, PollSeq, StatusMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The repeating timer fired. The first tick is emitted right after start.
    Tick,
    PollCompleted {
        seq: PollSeq,
        result: Result<StatusMap, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed status body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

impl From<FetchError> for PollFailure {
    fn from(err: FetchError) -> Self {
        match &err.kind {
            FailureKind::HttpStatus(code) => PollFailure::HttpStatus(*code),
            FailureKind::Timeout => PollFailure::Timeout,
            FailureKind::Decode => PollFailure::Decode {
                message: err.message,
            },
            FailureKind::TooLarge { .. } => PollFailure::Decode {
                message: err.to_string(),
            },
            FailureKind::Network => PollFailure::Transport {
                message: err.message,
            },
            FailureKind::InvalidUrl => PollFailure::Transport {
                message: err.to_string(),
            },
        }
    }
}
