//! Per-answer relevance feedback.
//!
//! The visual state only changes after the backend confirmed a submission.
//! Each submission carries a sequence number per query id; a confirmation
//! older than one already applied is ignored, so the most recently issued
//! successful judgment is what the buttons show.

use std::collections::HashMap;

use crate::types::{FeedbackButtons, FeedbackState, QueryId};

/// A feedback submission waiting for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackTicket {
    pub query_id: QueryId,
    pub relevant: bool,
    seq: u64,
}

#[derive(Debug, Default)]
struct Entry {
    state: FeedbackState,
    issued: u64,
    applied: u64,
}

#[derive(Debug, Default)]
pub struct FeedbackController {
    entries: HashMap<QueryId, Entry>,
}

impl FeedbackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire up the controls of a freshly appended answer.
    pub fn register(&mut self, query_id: QueryId) {
        self.entries.entry(query_id).or_default();
    }

    pub fn is_registered(&self, query_id: &QueryId) -> bool {
        self.entries.contains_key(query_id)
    }

    /// Start a submission. Unknown query ids have no controls and yield
    /// nothing.
    pub fn submit_feedback(&mut self, query_id: &QueryId, relevant: bool) -> Option<FeedbackTicket> {
        let entry = self.entries.get_mut(query_id)?;
        entry.issued += 1;
        Some(FeedbackTicket {
            query_id: query_id.clone(),
            relevant,
            seq: entry.issued,
        })
    }

    /// Backend accepted the submission. Returns whether the state changed
    /// hands to this ticket.
    pub fn confirm(&mut self, ticket: &FeedbackTicket) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.query_id) else {
            tracing::debug!(query_id = %ticket.query_id, "Feedback confirmed for a cleared answer");
            return false;
        };
        if ticket.seq <= entry.applied {
            tracing::debug!(
                query_id = %ticket.query_id,
                seq = ticket.seq,
                applied = entry.applied,
                "Ignoring stale feedback confirmation"
            );
            return false;
        }
        entry.applied = ticket.seq;
        entry.state = FeedbackState::from_relevant(ticket.relevant);
        true
    }

    pub fn state(&self, query_id: &QueryId) -> FeedbackState {
        self.entries
            .get(query_id)
            .map(|e| e.state)
            .unwrap_or_default()
    }

    pub fn buttons(&self, query_id: &QueryId) -> FeedbackButtons {
        FeedbackButtons::from(self.state(query_id))
    }

    /// Count of answers per recorded judgment: (relevant, irrelevant)
    pub fn tally(&self) -> (usize, usize) {
        self.entries
            .values()
            .fold((0, 0), |(rel, irr), entry| match entry.state {
                FeedbackState::Relevant => (rel + 1, irr),
                FeedbackState::Irrelevant => (rel, irr + 1),
                FeedbackState::Unset => (rel, irr),
            })
    }

    /// Forget everything (transcript was cleared).
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
