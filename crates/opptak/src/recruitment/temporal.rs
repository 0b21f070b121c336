use chrono::{DateTime, Duration, Utc};

use super::domain::Period;

/// Default window committees keep applicant access after interviews end.
pub const DEFAULT_ACCESS_GRACE_DAYS: i64 = 14;

/// Periods accepting applications or holding interviews at `now`.
///
/// Bounds are inclusive on both ends; being inside the preparation range
/// alone never makes a period active.
///
/// Works over anything that wraps a period, so stores can filter their
/// records directly.
pub fn currently_active<'a, P, I>(periods: I, now: DateTime<Utc>) -> Vec<&'a P>
where
    P: AsRef<Period> + 'a,
    I: IntoIterator<Item = &'a P>,
{
    periods
        .into_iter()
        .filter(|period| is_active(period.as_ref(), now))
        .collect()
}

pub fn is_active(period: &Period, now: DateTime<Utc>) -> bool {
    period.accepts_applications(now) || period.is_interviewing(now)
}

/// Access-control rule layered on top of temporal membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    grace: Duration,
}

impl AccessPolicy {
    pub fn new(grace: Duration) -> Self {
        let grace = if grace < Duration::zero() {
            Duration::zero()
        } else {
            grace
        };
        Self { grace }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Committees lose applicant access once the grace window after the
    /// interview range has fully elapsed.
    pub fn interview_access_expired(&self, period: &Period, now: DateTime<Utc>) -> bool {
        match period.interview_period.end.checked_add_signed(self.grace) {
            Some(cutoff) => now > cutoff,
            None => false,
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_ACCESS_GRACE_DAYS))
    }
}
