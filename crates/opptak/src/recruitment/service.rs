use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{PeriodDraft, PeriodId, PeriodRecord};
use super::eligibility::eligible_committees;
use super::repository::{PeriodRepository, RepositoryError};
use super::temporal::AccessPolicy;
use super::validation::{self, ValidationError};

/// Service composing the validator, temporal rules, and repository.
pub struct PeriodService<R> {
    repository: Arc<R>,
    access: AccessPolicy,
}

static PERIOD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_period_id() -> PeriodId {
    PeriodId::from_sequence(PERIOD_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<R> PeriodService<R>
where
    R: PeriodRepository + 'static,
{
    pub fn new(repository: Arc<R>, access: AccessPolicy) -> Self {
        Self { repository, access }
    }

    pub fn access_policy(&self) -> AccessPolicy {
        self.access
    }

    /// Validate a draft and persist it as a new period.
    pub fn create(&self, draft: PeriodDraft) -> Result<PeriodRecord, PeriodServiceError> {
        let period = validation::into_period(draft).map_err(|error| {
            warn!(kind = error.kind(), %error, "rejected period draft");
            error
        })?;

        let record = PeriodRecord {
            id: next_period_id(),
            period,
        };
        let stored = self.repository.insert(record)?;
        info!(period_id = %stored.id, name = %stored.period.name, "period created");
        Ok(stored)
    }

    /// Replace a stored period; the draft is validated in full.
    pub fn replace(
        &self,
        id: &PeriodId,
        draft: PeriodDraft,
    ) -> Result<PeriodRecord, PeriodServiceError> {
        let period = validation::into_period(draft).map_err(|error| {
            warn!(period_id = %id, kind = error.kind(), %error, "rejected period update");
            error
        })?;

        let record = PeriodRecord {
            id: id.clone(),
            period,
        };
        self.repository.update(record.clone())?;
        info!(period_id = %id, "period replaced");
        Ok(record)
    }

    pub fn get(&self, id: &PeriodId) -> Result<PeriodRecord, PeriodServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<PeriodRecord>, PeriodServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn delete(&self, id: &PeriodId) -> Result<(), PeriodServiceError> {
        if self.repository.delete(id)? {
            info!(period_id = %id, "period deleted");
            Ok(())
        } else {
            Err(RepositoryError::NotFound.into())
        }
    }

    /// Periods open for applications or interviews at `now`.
    pub fn current(&self, now: DateTime<Utc>) -> Result<Vec<PeriodRecord>, PeriodServiceError> {
        let active = self.repository.active_at(now)?;
        debug!(%now, count = active.len(), "resolved current periods");
        Ok(active)
    }

    /// Committees the caller may act on for a period, and whether their
    /// access to applicant data has lapsed.
    pub fn committee_access<'a, I>(
        &self,
        id: &PeriodId,
        user_committees: I,
        now: DateTime<Utc>,
    ) -> Result<CommitteeAccessView, PeriodServiceError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let record = self.get(id)?;
        let committees = eligible_committees(user_committees, &record.period);
        let access_expired = self.access.interview_access_expired(&record.period, now);

        Ok(CommitteeAccessView {
            period_id: record.id,
            period_name: record.period.name,
            committees,
            access_expired,
        })
    }
}

/// What a committee member may see for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitteeAccessView {
    pub period_id: PeriodId,
    pub period_name: String,
    pub committees: Vec<String>,
    pub access_expired: bool,
}

/// Error raised by the period service.
#[derive(Debug, thiserror::Error)]
pub enum PeriodServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
