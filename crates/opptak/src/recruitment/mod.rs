//! Recruitment periods and interview scheduling.
//!
//! Validation, temporal queries, committee eligibility, and the slot grid are
//! pure functions over immutable inputs. The service and router layer them on
//! top of a [`PeriodRepository`] supplied by the host.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;
pub mod temporal;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    DateRange, DraftRange, InvalidPeriodId, Period, PeriodDraft, PeriodId, PeriodRecord, RangeKind,
};
pub use eligibility::eligible_committees;
pub use repository::{PeriodRepository, RepositoryError};
pub use router::period_router;
pub use service::{CommitteeAccessView, PeriodService, PeriodServiceError};
pub use temporal::{currently_active, AccessPolicy};
pub use validation::{validate, violations, PeriodField, SequenceRule, ValidationError};
