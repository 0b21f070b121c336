use chrono::{Duration, NaiveTime};
use serde::Serialize;

use super::ScheduleError;

/// Day window split into fixed-length interview slots.
///
/// Slots are derived on demand and never stored, so they always reflect the
/// configured interview length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlotGrid {
    day_start: NaiveTime,
    day_end: NaiveTime,
    interview_length: Duration,
}

impl TimeSlotGrid {
    pub fn new(
        day_start: NaiveTime,
        day_end: NaiveTime,
        interview_length: Duration,
    ) -> Result<Self, ScheduleError> {
        if interview_length <= Duration::zero() {
            return Err(ScheduleError::InvalidDuration(interview_length));
        }

        Ok(Self {
            day_start,
            day_end,
            interview_length,
        })
    }

    pub fn interview_length(&self) -> Duration {
        self.interview_length
    }

    /// A fresh pass over the day's slot start times.
    pub fn slots(&self) -> TimeSlots {
        TimeSlots {
            day_start: self.day_start,
            window: self.window(),
            length: self.interview_length,
            offset: Duration::zero(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slot_at(&self, index: usize) -> Option<TimeSlot> {
        self.slots().nth(index).map(|start| TimeSlot {
            start,
            end: start + self.interview_length,
        })
    }

    /// Slots paired with their end times, for presentation.
    pub fn time_slots(&self) -> Vec<TimeSlot> {
        self.slots()
            .map(|start| TimeSlot {
                start,
                end: start + self.interview_length,
            })
            .collect()
    }

    fn window(&self) -> Duration {
        if self.day_start >= self.day_end {
            Duration::zero()
        } else {
            self.day_end.signed_duration_since(self.day_start)
        }
    }
}

/// Ordered slot start times for one day.
#[derive(Debug, Clone)]
pub struct TimeSlots {
    day_start: NaiveTime,
    window: Duration,
    length: Duration,
    offset: Duration,
}

impl Iterator for TimeSlots {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset + self.length > self.window {
            return None;
        }

        let start = self.day_start + self.offset;
        self.offset = self.offset + self.length;
        Some(start)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.window - self.offset;
        // A day window is at most 24h, so both fit in i64 nanoseconds.
        let count = match (
            (remaining - self.length).num_nanoseconds(),
            self.length.num_nanoseconds(),
        ) {
            (Some(spare), Some(length)) if spare >= 0 && length > 0 => {
                usize::try_from(spare / length + 1).unwrap_or(0)
            }
            _ => 0,
        };
        (count, Some(count))
    }
}

impl ExactSizeIterator for TimeSlots {}

/// One bookable interview slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Slot start times from `day_start` while a whole interview still fits
/// before `day_end`.
pub fn generate_slots(
    day_start: NaiveTime,
    day_end: NaiveTime,
    interview_length: Duration,
) -> Result<TimeSlots, ScheduleError> {
    TimeSlotGrid::new(day_start, day_end, interview_length).map(|grid| grid.slots())
}
