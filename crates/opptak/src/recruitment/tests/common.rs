use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::recruitment::domain::{DraftRange, Period, PeriodDraft, PeriodId, PeriodRecord};
use crate::recruitment::repository::{PeriodRepository, RepositoryError};
use crate::recruitment::temporal::{currently_active, AccessPolicy};
use crate::recruitment::{period_router, PeriodService};

pub(super) fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn instant_hms(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .expect("valid instant")
}

fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<DraftRange> {
    Some(DraftRange {
        start: Some(start),
        end: Some(end),
    })
}

/// Well-formed spring intake: prep Jan 1-10, applications Jan 10-Feb 1,
/// interviews Feb 2-20.
pub(super) fn spring_draft() -> PeriodDraft {
    PeriodDraft {
        name: Some("V24".to_string()),
        preparation_period: range(instant(2024, 1, 1), instant(2024, 1, 10)),
        application_period: range(instant(2024, 1, 10), instant(2024, 2, 1)),
        interview_period: range(instant(2024, 2, 2), instant(2024, 2, 20)),
        committees: Some(vec!["dotkom".to_string()]),
        optional_committees: Some(Vec::new()),
    }
}

/// Autumn intake with required and optional committees.
pub(super) fn autumn_draft() -> PeriodDraft {
    PeriodDraft {
        name: Some("H24".to_string()),
        preparation_period: range(instant(2024, 8, 1), instant(2024, 8, 15)),
        application_period: range(instant(2024, 8, 15), instant(2024, 9, 1)),
        interview_period: range(instant(2024, 9, 2), instant(2024, 9, 20)),
        committees: Some(vec![
            "Dotkom".to_string(),
            "Arrkom".to_string(),
            "Bedkom".to_string(),
        ]),
        optional_committees: Some(vec!["FeminIT".to_string()]),
    }
}

pub(super) fn spring_period() -> Period {
    crate::recruitment::validation::into_period(spring_draft()).expect("spring draft is valid")
}

pub(super) fn autumn_period() -> Period {
    crate::recruitment::validation::into_period(autumn_draft()).expect("autumn draft is valid")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<PeriodId, PeriodRecord>>>,
}

impl PeriodRepository for MemoryRepository {
    fn insert(&self, record: PeriodRecord) -> Result<PeriodRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: PeriodRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &PeriodId) -> Result<Option<PeriodRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<PeriodRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete(&self, id: &PeriodId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }

    fn active_at(&self, now: DateTime<Utc>) -> Result<Vec<PeriodRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(currently_active(guard.values(), now)
            .into_iter()
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl PeriodRepository for ConflictRepository {
    fn insert(&self, _record: PeriodRecord) -> Result<PeriodRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: PeriodRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &PeriodId) -> Result<Option<PeriodRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<PeriodRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn delete(&self, _id: &PeriodId) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    fn active_at(&self, _now: DateTime<Utc>) -> Result<Vec<PeriodRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl PeriodRepository for UnavailableRepository {
    fn insert(&self, _record: PeriodRecord) -> Result<PeriodRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: PeriodRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PeriodId) -> Result<Option<PeriodRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<PeriodRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &PeriodId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn active_at(&self, _now: DateTime<Utc>) -> Result<Vec<PeriodRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (PeriodService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = PeriodService::new(Arc::new(repository.clone()), AccessPolicy::default());
    (service, repository)
}

pub(super) fn router_with_service(service: PeriodService<MemoryRepository>) -> axum::Router {
    period_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
