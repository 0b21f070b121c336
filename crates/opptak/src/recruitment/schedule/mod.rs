pub mod booking;
pub mod selection;
pub mod slots;

pub use booking::{BookingChange, SlotBook};
pub use selection::{ColumnState, PointerEvent, SlotRange, SlotSelection, SlotSelectionSession};
pub use slots::{generate_slots, TimeSlot, TimeSlotGrid, TimeSlots};

use chrono::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("interview length must be positive, got {0}")]
    InvalidDuration(Duration),
}
