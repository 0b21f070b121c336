use chrono::{DateTime, Utc};

use super::domain::{PeriodId, PeriodRecord};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PeriodRepository: Send + Sync {
    fn insert(&self, record: PeriodRecord) -> Result<PeriodRecord, RepositoryError>;
    fn update(&self, record: PeriodRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PeriodId) -> Result<Option<PeriodRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<PeriodRecord>, RepositoryError>;
    /// Returns `true` when a record was removed.
    fn delete(&self, id: &PeriodId) -> Result<bool, RepositoryError>;
    /// Periods whose application or interview range contains `now`.
    fn active_at(&self, now: DateTime<Utc>) -> Result<Vec<PeriodRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
