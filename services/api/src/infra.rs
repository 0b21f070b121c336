use chrono::{DateTime, NaiveTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use opptak::config::SchedulingConfig;
use opptak::recruitment::{
    currently_active, PeriodId, PeriodRecord, PeriodRepository, RepositoryError,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) scheduling: SchedulingConfig,
}

/// Process-local period store standing in for the document database.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPeriodRepository {
    records: Arc<Mutex<BTreeMap<PeriodId, PeriodRecord>>>,
}

impl InMemoryPeriodRepository {
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PeriodId, PeriodRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("period store lock poisoned".to_string()))
    }
}

impl PeriodRepository for InMemoryPeriodRepository {
    fn insert(&self, record: PeriodRecord) -> Result<PeriodRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: PeriodRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &PeriodId) -> Result<Option<PeriodRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<PeriodRecord>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn delete(&self, id: &PeriodId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.remove(id).is_some())
    }

    fn active_at(&self, now: DateTime<Utc>) -> Result<Vec<PeriodRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(currently_active(guard.values(), now)
            .into_iter()
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 instant ({err})"))
}

pub(crate) fn deserialize_optional_time<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_time(&value).map_err(serde::de::Error::custom))
        .transpose()
}
