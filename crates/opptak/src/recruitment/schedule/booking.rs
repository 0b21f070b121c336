use std::collections::{BTreeSet, HashMap};

use chrono::Weekday;
use serde::Serialize;

use super::selection::SlotSelection;

/// Offered interview slots per weekday column.
///
/// This is the client-side view only; claiming a slot atomically is the
/// store's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotBook {
    offered: HashMap<Weekday, BTreeSet<usize>>,
}

/// Effect of applying one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingChange {
    pub weekday: Option<Weekday>,
    pub added: Vec<usize>,
    pub removed: Vec<usize>,
}

impl BookingChange {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl SlotBook {
    /// A single-slot selection toggles that slot; a wider one offers every
    /// slot in range and leaves already offered slots untouched.
    pub fn apply(&mut self, selection: &SlotSelection) -> BookingChange {
        let column = self.offered.entry(selection.weekday).or_default();
        let mut change = BookingChange {
            weekday: Some(selection.weekday),
            ..BookingChange::default()
        };

        if selection.range.is_single() {
            let index = selection.range.first;
            if column.remove(&index) {
                change.removed.push(index);
            } else {
                column.insert(index);
                change.added.push(index);
            }
        } else {
            for index in selection.range.indices() {
                if column.insert(index) {
                    change.added.push(index);
                }
            }
        }

        if column.is_empty() {
            self.offered.remove(&selection.weekday);
        }

        change
    }

    pub fn is_offered(&self, weekday: Weekday, index: usize) -> bool {
        self.offered
            .get(&weekday)
            .is_some_and(|column| column.contains(&index))
    }

    pub fn offered(&self, weekday: Weekday) -> Vec<usize> {
        self.offered
            .get(&weekday)
            .map(|column| column.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.offered.values().map(BTreeSet::len).sum()
    }
}
