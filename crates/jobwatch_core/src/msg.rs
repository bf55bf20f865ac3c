use std::fmt;

use crate::{PollSeq, StatusMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Scheduler tick. The first one arrives at startup.
    Tick,
    /// A poll returned a decoded status map.
    PollSucceeded { seq: PollSeq, statuses: StatusMap },
    /// A poll ended without a usable status map.
    PollFailed { seq: PollSeq, failure: PollFailure },
}

/// Why a poll cycle produced nothing to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollFailure {
    /// The request never got a response (connection refused, DNS, reset...).
    Transport { message: String },
    Timeout,
    /// The server answered with a non-success status.
    HttpStatus(u16),
    /// A success response whose body is not a status map.
    Decode { message: String },
}

impl fmt::Display for PollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollFailure::Transport { message } => write!(f, "transport error: {message}"),
            PollFailure::Timeout => write!(f, "timeout"),
            PollFailure::HttpStatus(code) => write!(f, "http status {code}"),
            PollFailure::Decode { message } => write!(f, "malformed status body: {message}"),
        }
    }
}
