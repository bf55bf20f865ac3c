use std::collections::BTreeSet;

use crate::render::{render, TableBody};
use crate::view_model::AppViewModel;
use crate::StatusMap;

/// Monotonically increasing tag attached to every issued poll.
pub type PollSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollSettings {
    /// Drop a tick while an earlier poll is still outstanding.
    pub skip_when_in_flight: bool,
    /// Emit a diagnostic for non-success HTTP responses. Off by default:
    /// such responses are ignored silently.
    pub report_http_status: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    settings: PollSettings,
    next_seq: PollSeq,
    shown_seq: Option<PollSeq>,
    in_flight: BTreeSet<PollSeq>,
    table: TableBody,
    completed_polls: u64,
    stale_discarded: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(PollSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: PollSettings) -> Self {
        Self {
            settings,
            next_seq: 1,
            shown_seq: None,
            in_flight: BTreeSet::new(),
            table: TableBody::new(),
            completed_polls: 0,
            stale_discarded: 0,
            dirty: false,
        }
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    pub fn table(&self) -> &TableBody {
        &self.table
    }

    pub fn completed_polls(&self) -> u64 {
        self.completed_polls
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            rows: self.table.rows().to_vec(),
            shown_seq: self.shown_seq,
            in_flight: self.in_flight.len(),
            stale_discarded: self.stale_discarded,
        }
    }

    /// Returns whether the table was re-rendered since the last call, and
    /// clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Allocate the next sequence number, or `None` when overlap is disabled
    /// and a poll is outstanding.
    pub(crate) fn begin_poll(&mut self) -> Option<PollSeq> {
        if self.settings.skip_when_in_flight && !self.in_flight.is_empty() {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight.insert(seq);
        Some(seq)
    }

    pub(crate) fn finish_poll(&mut self, seq: PollSeq) {
        self.in_flight.remove(&seq);
        self.completed_polls += 1;
    }

    /// Render `statuses` unless a newer poll is already shown.
    pub(crate) fn apply_statuses(&mut self, seq: PollSeq, statuses: &StatusMap) -> bool {
        if self.shown_seq.is_some_and(|shown| seq <= shown) {
            self.stale_discarded += 1;
            return false;
        }
        render(&mut self.table, statuses);
        self.shown_seq = Some(seq);
        self.dirty = true;
        true
    }
}
