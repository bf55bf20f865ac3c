use crate::{PollFailure, PollSeq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the status map once; the result comes back tagged with `seq`.
    IssuePoll { seq: PollSeq },
    /// Emit one diagnostic for a failed poll. Never shown in the table.
    ReportFailure { seq: PollSeq, failure: PollFailure },
}
