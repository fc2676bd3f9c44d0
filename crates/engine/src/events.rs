//! Change notifications for a grid session.
//!
//! Every successful state change advances the revision by one and records one
//! or more events under it (`remove_row` can record the removal, a highlight
//! prune and a focus shift together). The log keeps only the most recent
//! events; older ones are dropped once it reaches capacity.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cell::Amount;

/// Events kept by [`EventLog::new`].
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// What changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GridEvent {
    /// The whole grid was replaced.
    Generated { rows: usize, columns: usize },
    /// One cell counted up.
    CellIncremented { row: usize, col: usize, amount: Amount },
    /// A row was appended at `index`.
    RowAdded { index: usize },
    /// The row at `index` was removed; later rows shifted down.
    RowRemoved { index: usize },
    /// The highlight set was recomputed or cleared.
    HighlightChanged { count: usize },
    /// The percent-focus row was set or cleared.
    PercentFocusChanged { row: Option<usize> },
    /// The requested highlight count changed.
    HighlightCountChanged { count: usize },
}

/// An event and the revision that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revisioned {
    pub revision: u64,
    #[serde(flatten)]
    pub event: GridEvent,
}

/// Bounded, in-order record of recent session events.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Revisioned>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// A log holding at most `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, revision: u64, event: GridEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Revisioned { revision, event });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Revisioned> + '_ {
        self.events.iter()
    }

    /// Retained events produced after `revision`.
    pub fn since(&self, revision: u64) -> impl Iterator<Item = &Revisioned> + '_ {
        let start = self.events.partition_point(|e| e.revision <= revision);
        self.events.range(start..)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Last event, if any.
    pub fn last(&self) -> Option<&Revisioned> {
        self.events.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_since() {
        let mut log = EventLog::new();
        log.push(1, GridEvent::Generated { rows: 2, columns: 2 });
        log.push(2, GridEvent::RowAdded { index: 2 });
        log.push(3, GridEvent::HighlightChanged { count: 1 });

        assert_eq!(log.len(), 3);
        assert_eq!(log.since(0).count(), 3);
        assert_eq!(log.since(2).count(), 1);
        assert_eq!(log.since(3).count(), 0);
        assert_eq!(log.last().unwrap().event, GridEvent::HighlightChanged { count: 1 });
    }

    #[test]
    fn test_event_log_drops_oldest_at_capacity() {
        let mut log = EventLog::with_capacity(3);
        for rev in 1..=5 {
            log.push(rev, GridEvent::HighlightChanged { count: 0 });
        }
        assert_eq!(log.len(), 3);
        let revisions: Vec<u64> = log.iter().map(|e| e.revision).collect();
        assert_eq!(revisions, vec![3, 4, 5]);
        assert_eq!(log.since(4).count(), 1);
        assert_eq!(EventLog::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn test_event_round_trips_on_the_wire() {
        let line = r#"{"revision":2,"event":"percent_focus_changed","row":null}"#;
        let parsed: Revisioned = serde_json::from_str(line).unwrap();
        assert_eq!(parsed.event, GridEvent::PercentFocusChanged { row: None });
    }

    #[test]
    fn test_event_serialization() {
        let e = Revisioned {
            revision: 4,
            event: GridEvent::CellIncremented { row: 0, col: 1, amount: 3 },
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"revision": 4, "event": "cell_incremented", "row": 0, "col": 1, "amount": 3})
        );
    }
}
