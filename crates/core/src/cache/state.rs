//! Per-identity cache entries and their reconciliation state.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::model::Item;
use crate::page::Page;

/// Reconciliation state of one query identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum QueryState {
    /// Holding the last known snapshot, possibly unset or stale.
    Idle,
    /// Optimistic mutations are awaiting their remote outcome.
    Pending { in_flight: usize },
    /// A settlement is being applied. Never observed outside the cache lock.
    Reconciling,
}

/// Result of a fetch that reached the remote collection successfully.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The page replaced the cached snapshot.
    Applied(Arc<Page<Item>>),
    /// A mutation began after the fetch started; the page was dropped.
    Discarded,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied(_))
    }
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) snapshot: Option<Arc<Page<Item>>>,
    pub(crate) state: QueryState,
    pub(crate) stale: bool,
    /// Row offset of the cached page.
    pub(crate) offset: u32,
    /// Bumped when an optimistic mutation begins. A fetch that started under
    /// an older generation is discarded on arrival.
    pub(crate) generation: u64,
    pub(crate) refetch: Option<JoinHandle<()>>,
}

impl Default for Entry {
    fn default() -> Self {
        Self { snapshot: None, state: QueryState::Idle, stale: true, offset: 0, generation: 0, refetch: None }
    }
}

impl Entry {
    pub(crate) fn in_flight(&self) -> usize {
        match self.state {
            QueryState::Pending { in_flight } => in_flight,
            QueryState::Idle | QueryState::Reconciling => 0,
        }
    }

    /// Idle → Pending, or one more mutation on an already pending identity.
    pub(crate) fn begin_mutation(&mut self) {
        self.generation += 1;
        self.state = QueryState::Pending { in_flight: self.in_flight() + 1 };
    }

    /// Pending → Reconciling. Returns how many mutations remain in flight
    /// once this one settles.
    pub(crate) fn start_settlement(&mut self) -> usize {
        let remaining = self.in_flight().saturating_sub(1);
        self.state = QueryState::Reconciling;
        remaining
    }

    /// Reconciling → Idle (or back to Pending if others are in flight).
    pub(crate) fn finish_settlement(&mut self, remaining: usize) {
        self.stale = true;
        self.state = if remaining == 0 { QueryState::Idle } else { QueryState::Pending { in_flight: remaining } };
    }

    /// Whether a fetch started at `generation` may still be applied.
    pub(crate) fn accepts_fetch(&self, generation: u64) -> bool {
        self.generation == generation && self.in_flight() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_lifecycle() {
        let mut entry = Entry::default();
        assert_eq!(entry.state, QueryState::Idle);

        entry.begin_mutation();
        assert_eq!(entry.state, QueryState::Pending { in_flight: 1 });
        assert_eq!(entry.generation, 1);

        let remaining = entry.start_settlement();
        assert_eq!(entry.state, QueryState::Reconciling);
        entry.finish_settlement(remaining);
        assert_eq!(entry.state, QueryState::Idle);
        assert!(entry.stale);
    }

    #[test]
    fn test_overlapping_mutations() {
        let mut entry = Entry::default();
        entry.begin_mutation();
        entry.begin_mutation();
        assert_eq!(entry.in_flight(), 2);

        let remaining = entry.start_settlement();
        entry.finish_settlement(remaining);
        assert_eq!(entry.state, QueryState::Pending { in_flight: 1 });
    }

    #[test]
    fn test_accepts_fetch() {
        let mut entry = Entry::default();
        let started = entry.generation;
        assert!(entry.accepts_fetch(started));

        entry.begin_mutation();
        assert!(!entry.accepts_fetch(started));

        let remaining = entry.start_settlement();
        entry.finish_settlement(remaining);
        assert!(entry.accepts_fetch(entry.generation));
    }

    #[test]
    fn test_state_serializes_tagged() {
        let json = serde_json::to_value(QueryState::Pending { in_flight: 2 }).unwrap();
        assert_eq!(json["state"], "pending");
        assert_eq!(json["in_flight"], 2);
    }
}
