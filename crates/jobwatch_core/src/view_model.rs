use crate::{PollSeq, TableRow};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rows: Vec<TableRow>,
    /// Sequence number of the poll currently shown, if any.
    pub shown_seq: Option<PollSeq>,
    pub in_flight: usize,
    /// Results dropped because a newer poll was already shown.
    pub stale_discarded: u64,
}
