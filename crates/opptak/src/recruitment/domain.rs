use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document identifier for a stored period: 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodId(String);

impl PeriodId {
    pub const LEN: usize = 24;

    pub fn parse(raw: &str) -> Result<Self, InvalidPeriodId> {
        let trimmed = raw.trim();
        if trimmed.len() == Self::LEN && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(InvalidPeriodId(raw.to_string()))
        }
    }

    pub(crate) fn from_sequence(value: u64) -> Self {
        Self(format!("{value:024x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PeriodId {
    type Err = InvalidPeriodId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PeriodId {
    type Error = InvalidPeriodId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PeriodId> for String {
    fn from(value: PeriodId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("period id '{0}' is not a 24 character hex identifier")]
pub struct InvalidPeriodId(pub String);

/// Closed instant range; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// One recruitment cycle. Only built from a draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub name: String,
    pub preparation_period: DateRange,
    pub application_period: DateRange,
    pub interview_period: DateRange,
    pub committees: Vec<String>,
    #[serde(default)]
    pub optional_committees: Vec<String>,
}

impl Period {
    pub fn accepts_applications(&self, now: DateTime<Utc>) -> bool {
        self.application_period.contains(now)
    }

    pub fn is_interviewing(&self, now: DateTime<Utc>) -> bool {
        self.interview_period.contains(now)
    }

    /// Required committees followed by optional ones.
    pub fn all_committees(&self) -> impl Iterator<Item = &str> {
        self.committees
            .iter()
            .chain(self.optional_committees.iter())
            .map(String::as_str)
    }

    pub fn to_draft(&self) -> PeriodDraft {
        PeriodDraft {
            name: Some(self.name.clone()),
            preparation_period: Some(DraftRange::from(self.preparation_period)),
            application_period: Some(DraftRange::from(self.application_period)),
            interview_period: Some(DraftRange::from(self.interview_period)),
            committees: Some(self.committees.clone()),
            optional_committees: Some(self.optional_committees.clone()),
        }
    }
}

/// Comparison key for committee names: trimmed and lower-cased.
pub(crate) fn committee_key(committee: &str) -> String {
    committee.trim().to_lowercase()
}

/// Possibly incomplete range as submitted by an editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRange {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl From<DateRange> for DraftRange {
    fn from(range: DateRange) -> Self {
        Self {
            start: Some(range.start),
            end: Some(range.end),
        }
    }
}

/// Candidate period as received from a create or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preparation_period: Option<DraftRange>,
    #[serde(default)]
    pub application_period: Option<DraftRange>,
    #[serde(default)]
    pub interview_period: Option<DraftRange>,
    #[serde(default)]
    pub committees: Option<Vec<String>>,
    #[serde(default)]
    pub optional_committees: Option<Vec<String>>,
}

/// Stored period together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub id: PeriodId,
    #[serde(flatten)]
    pub period: Period,
}

impl AsRef<Period> for Period {
    fn as_ref(&self) -> &Period {
        self
    }
}

impl AsRef<Period> for PeriodRecord {
    fn as_ref(&self) -> &Period {
        &self.period
    }
}

/// Which of the three period ranges a check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    Preparation,
    Application,
    Interview,
}

impl RangeKind {
    pub const ALL: [RangeKind; 3] = [
        RangeKind::Preparation,
        RangeKind::Application,
        RangeKind::Interview,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RangeKind::Preparation => "preparationPeriod",
            RangeKind::Application => "applicationPeriod",
            RangeKind::Interview => "interviewPeriod",
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn committee_keys_ignore_case_and_padding() {
        assert_eq!(committee_key("  FeminIT "), "feminit");
        assert_eq!(committee_key("Dotkom"), committee_key("dotkom"));
    }

    #[test]
    fn period_id_accepts_hex_and_normalizes_case() {
        let id = PeriodId::parse("65A1B2C3D4E5F60718293A4B").expect("valid id");
        assert_eq!(id.as_str(), "65a1b2c3d4e5f60718293a4b");
        assert!(PeriodId::parse("not-an-id").is_err());
        assert!(PeriodId::parse("65a1b2c3d4e5f60718293a4").is_err());
        assert!(PeriodId::parse("65a1b2c3d4e5f60718293a4z").is_err());
    }

    #[test]
    fn sequence_ids_are_well_formed() {
        let id = PeriodId::from_sequence(42);
        assert_eq!(id.as_str().len(), PeriodId::LEN);
        assert_eq!(PeriodId::parse(id.as_str()), Ok(id));
    }

    #[test]
    fn record_serializes_with_document_field_names() {
        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).single().expect("valid");
        let record = PeriodRecord {
            id: PeriodId::from_sequence(1),
            period: Period {
                name: "V24".to_string(),
                preparation_period: DateRange::new(day(1), day(10)),
                application_period: DateRange::new(day(10), day(20)),
                interview_period: DateRange::new(day(21), day(30)),
                committees: vec!["dotkom".to_string()],
                optional_committees: Vec::new(),
            },
        };

        let json = serde_json::to_value(&record).expect("serializes");
        assert_eq!(json["id"], "000000000000000000000001");
        assert_eq!(json["name"], "V24");
        assert!(json["applicationPeriod"]["start"].is_string());
        assert!(json["optionalCommittees"].is_array());

        let back: PeriodRecord = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, record);
    }
}
