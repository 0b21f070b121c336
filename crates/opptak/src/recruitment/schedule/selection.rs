//! Drag-to-select over weekday slot columns.
//!
//! Each column is a two-state machine ([`ColumnState`]) with pure transitions.
//! [`SlotSelectionSession`] owns at most one dragging column at a time and
//! turns pointer events into finalized [`SlotSelection`]s.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Contiguous, inclusive span of slot indices within one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRange {
    pub first: usize,
    pub last: usize,
}

impl SlotRange {
    /// Range covering both indices regardless of drag direction.
    pub fn spanning(a: usize, b: usize) -> Self {
        Self {
            first: a.min(b),
            last: a.max(b),
        }
    }

    pub fn single(index: usize) -> Self {
        Self::spanning(index, index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.first <= index && index <= self.last
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn is_single(&self) -> bool {
        self.first == self.last
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Finalized gesture handed to the booking side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelection {
    pub weekday: Weekday,
    pub range: SlotRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnState {
    #[default]
    Idle,
    Dragging { anchor: usize, current: usize },
}

impl ColumnState {
    pub fn press(self, index: usize) -> Self {
        ColumnState::Dragging {
            anchor: index,
            current: index,
        }
    }

    pub fn move_to(self, index: usize) -> Self {
        match self {
            ColumnState::Dragging { anchor, .. } => ColumnState::Dragging {
                anchor,
                current: index,
            },
            ColumnState::Idle => ColumnState::Idle,
        }
    }

    /// Returns to idle, yielding the range that was being dragged.
    pub fn release(self) -> (Self, Option<SlotRange>) {
        (ColumnState::Idle, self.highlighted())
    }

    /// Abandons any drag without yielding a range.
    pub fn leave(self) -> Self {
        ColumnState::Idle
    }

    pub fn highlighted(&self) -> Option<SlotRange> {
        match *self {
            ColumnState::Dragging { anchor, current } => Some(SlotRange::spanning(anchor, current)),
            ColumnState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, ColumnState::Dragging { .. })
    }
}

/// Pointer-gesture tracker for one client across all weekday columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSelectionSession {
    slots_per_column: usize,
    active: Option<(Weekday, ColumnState)>,
}

impl SlotSelectionSession {
    /// Indices at or beyond `slots_per_column` are ignored.
    pub fn new(slots_per_column: usize) -> Self {
        Self {
            slots_per_column,
            active: None,
        }
    }

    pub fn slots_per_column(&self) -> usize {
        self.slots_per_column
    }

    /// Start a drag on `weekday`, abandoning a drag on any other column.
    pub fn press(&mut self, weekday: Weekday, index: usize) {
        if index >= self.slots_per_column {
            return;
        }

        let state = match self.active {
            Some((active_day, state)) if active_day == weekday => state,
            _ => ColumnState::Idle,
        };
        self.active = Some((weekday, state.press(index)));
    }

    pub fn move_to(&mut self, weekday: Weekday, index: usize) {
        if index >= self.slots_per_column {
            return;
        }

        if let Some((active_day, state)) = self.active {
            if active_day == weekday {
                self.active = Some((weekday, state.move_to(index)));
            }
        }
    }

    /// Finish the drag on `weekday`. Releasing any other column changes nothing.
    pub fn release(&mut self, weekday: Weekday) -> Option<SlotSelection> {
        let (active_day, state) = self.active?;
        if active_day != weekday {
            return None;
        }

        let (_, range) = state.release();
        self.active = None;
        range.map(|range| SlotSelection { weekday, range })
    }

    /// Pointer left `weekday`; its drag is cancelled with nothing emitted.
    pub fn leave(&mut self, weekday: Weekday) {
        if matches!(self.active, Some((active_day, _)) if active_day == weekday) {
            self.active = None;
        }
    }

    pub fn column_state(&self, weekday: Weekday) -> ColumnState {
        match self.active {
            Some((active_day, state)) if active_day == weekday => state,
            _ => ColumnState::Idle,
        }
    }

    pub fn highlighted(&self, weekday: Weekday) -> Option<SlotRange> {
        self.column_state(weekday).highlighted()
    }

    pub fn active_column(&self) -> Option<Weekday> {
        self.active.map(|(weekday, _)| weekday)
    }
}

/// Pointer event as emitted by a schedule column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerEvent {
    Press { weekday: Weekday, index: usize },
    Move { weekday: Weekday, index: usize },
    Release { weekday: Weekday },
    Leave { weekday: Weekday },
}

impl SlotSelectionSession {
    pub fn handle(&mut self, event: PointerEvent) -> Option<SlotSelection> {
        match event {
            PointerEvent::Press { weekday, index } => {
                self.press(weekday, index);
                None
            }
            PointerEvent::Move { weekday, index } => {
                self.move_to(weekday, index);
                None
            }
            PointerEvent::Release { weekday } => self.release(weekday),
            PointerEvent::Leave { weekday } => {
                self.leave(weekday);
                None
            }
        }
    }

    /// Feed a sequence of events, collecting every finalized selection.
    pub fn replay<I>(&mut self, events: I) -> Vec<SlotSelection>
    where
        I: IntoIterator<Item = PointerEvent>,
    {
        events
            .into_iter()
            .filter_map(|event| self.handle(event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday::{Mon, Tue};

    #[test]
    fn drag_direction_does_not_matter() {
        for (anchor, current) in [(2, 5), (5, 2), (3, 3)] {
            let mut session = SlotSelectionSession::new(10);
            session.press(Mon, anchor);
            session.move_to(Mon, current);
            let selection = session.release(Mon).expect("selection emitted");
            assert_eq!(selection.range, SlotRange::spanning(anchor, current));
            assert_eq!(selection.range.first, anchor.min(current));
            assert_eq!(selection.range.last, anchor.max(current));
        }
    }

    #[test]
    fn leaving_column_abandons_drag() {
        let mut session = SlotSelectionSession::new(10);
        session.press(Mon, 1);
        session.move_to(Mon, 4);
        session.leave(Mon);
        assert_eq!(session.column_state(Mon), ColumnState::Idle);
        assert_eq!(session.release(Mon), None);
    }

    #[test]
    fn idle_moves_and_releases_emit_nothing() {
        let mut session = SlotSelectionSession::new(10);
        session.move_to(Mon, 3);
        assert_eq!(session.release(Mon), None);
        assert_eq!(session.column_state(Mon), ColumnState::Idle);
    }

    #[test]
    fn pressing_another_column_abandons_previous_drag() {
        let mut session = SlotSelectionSession::new(10);
        session.press(Mon, 1);
        session.move_to(Mon, 6);
        session.press(Tue, 2);

        assert_eq!(session.column_state(Mon), ColumnState::Idle);
        assert_eq!(session.release(Mon), None);
        assert_eq!(
            session.release(Tue),
            Some(SlotSelection {
                weekday: Tue,
                range: SlotRange::single(2),
            })
        );
    }

    #[test]
    fn events_on_other_columns_leave_active_drag_alone() {
        let mut session = SlotSelectionSession::new(10);
        session.press(Mon, 2);
        session.move_to(Tue, 7);
        session.leave(Tue);
        assert_eq!(session.release(Tue), None);
        assert_eq!(session.highlighted(Mon), Some(SlotRange::single(2)));
    }

    #[test]
    fn highlighted_range_tracks_moves() {
        let mut session = SlotSelectionSession::new(10);
        session.press(Mon, 4);
        session.move_to(Mon, 7);
        assert_eq!(session.highlighted(Mon), Some(SlotRange { first: 4, last: 7 }));
        session.move_to(Mon, 1);
        assert_eq!(session.highlighted(Mon), Some(SlotRange { first: 1, last: 4 }));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut session = SlotSelectionSession::new(4);
        session.press(Mon, 4);
        assert_eq!(session.active_column(), None);

        session.press(Mon, 1);
        session.move_to(Mon, 9);
        assert_eq!(session.highlighted(Mon), Some(SlotRange::single(1)));
    }

    #[test]
    fn column_state_transitions_are_pure() {
        let idle = ColumnState::Idle;
        let dragging = idle.press(3).move_to(1);
        assert_eq!(dragging, ColumnState::Dragging { anchor: 3, current: 1 });
        assert_eq!(dragging.leave(), ColumnState::Idle);
        assert_eq!(dragging.release(), (ColumnState::Idle, Some(SlotRange::spanning(1, 3))));
        assert_eq!(idle.move_to(2), ColumnState::Idle);
        assert_eq!(idle.release(), (ColumnState::Idle, None));
    }
}
