//! Snapshot history shared across both panes

use crate::pane::PaneState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of snapshots retained before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 30;

/// A deep copy of both panes, captured before a mutating action.
///
/// Snapshots are values: they share nothing with the live session, so a
/// later mutation can never reach back into one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub source: PaneState,
    pub translation: PaneState,
}

/// Bounded undo stack.
///
/// Push-only except for [`History::pop`], which undo uses to take the most
/// recent snapshot. When full, pushing evicts the oldest entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.snapshots.len() == HISTORY_CAPACITY {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Take the most recent snapshot. None on an empty stack; undo
    /// underflow is a no-op, not an error.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_numbered(n: usize) -> Snapshot {
        let mut source = PaneState::new();
        source.set_plain_text(&format!("state {n}"));
        Snapshot {
            source,
            translation: PaneState::new(),
        }
    }

    #[test]
    fn test_pop_returns_most_recent() {
        let mut history = History::new();
        history.push(snapshot_numbered(1));
        history.push(snapshot_numbered(2));
        let top = history.pop().unwrap();
        assert_eq!(top.source.visible_text(), "state 2");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut history = History::new();
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new();
        for n in 0..35 {
            history.push(snapshot_numbered(n));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);

        // Exactly the most recent 30 come back, newest first.
        let mut seen = Vec::new();
        while let Some(snapshot) = history.pop() {
            seen.push(snapshot.source.visible_text());
        }
        assert_eq!(seen.len(), 30);
        assert_eq!(seen.first().map(String::as_str), Some("state 34"));
        assert_eq!(seen.last().map(String::as_str), Some("state 5"));
    }
}
