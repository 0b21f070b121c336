//! Gate every period create and replace passes through.
//!
//! Checks run in a fixed order: field presence, cross-range sequencing,
//! intra-range ordering, then committee rules. [`validate`] stops at the first
//! failure; [`violations`] reports everything it can without ever comparing a
//! date that is missing.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{committee_key, DateRange, DraftRange, Period, PeriodDraft, RangeKind};

/// Field that must be present before any date comparison happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodField {
    Name,
    Start(RangeKind),
    End(RangeKind),
}

impl fmt::Display for PeriodField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodField::Name => f.write_str("name"),
            PeriodField::Start(range) => write!(f, "{range}.start"),
            PeriodField::End(range) => write!(f, "{range}.end"),
        }
    }
}

/// Cross-range ordering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceRule {
    PrepBeforeApplication,
    ApplicationBeforeInterview,
}

impl SequenceRule {
    pub const fn label(self) -> &'static str {
        match self {
            SequenceRule::PrepBeforeApplication => "prep-before-application",
            SequenceRule::ApplicationBeforeInterview => "application-before-interview",
        }
    }
}

impl fmt::Display for SequenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field {0} is missing")]
    MissingField(PeriodField),
    #[error("periods are out of sequence ({0})")]
    SequenceViolation(SequenceRule),
    #[error("{0} starts after it ends")]
    InvertedRange(RangeKind),
    #[error("at least one committee must be selected")]
    NoCommittee,
    #[error("committees also listed as optional: {}", .0.join(", "))]
    CommitteeOverlap(Vec<String>),
}

impl ValidationError {
    /// Stable machine-readable tag.
    pub const fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::SequenceViolation(_) => "sequence_violation",
            ValidationError::InvertedRange(_) => "inverted_range",
            ValidationError::NoCommittee => "no_committee",
            ValidationError::CommitteeOverlap(_) => "committee_overlap",
        }
    }
}

/// Draft with every required field present.
struct CompleteDraft<'a> {
    preparation: DateRange,
    application: DateRange,
    interview: DateRange,
    committees: &'a [String],
    optional_committees: &'a [String],
}

impl CompleteDraft<'_> {
    fn range(&self, kind: RangeKind) -> DateRange {
        match kind {
            RangeKind::Preparation => self.preparation,
            RangeKind::Application => self.application,
            RangeKind::Interview => self.interview,
        }
    }
}

fn draft_range(draft: &PeriodDraft, kind: RangeKind) -> Option<&DraftRange> {
    match kind {
        RangeKind::Preparation => draft.preparation_period.as_ref(),
        RangeKind::Application => draft.application_period.as_ref(),
        RangeKind::Interview => draft.interview_period.as_ref(),
    }
}

fn missing_fields(draft: &PeriodDraft) -> Vec<PeriodField> {
    let mut missing = Vec::new();

    if draft.name.as_deref().map_or(true, |name| name.trim().is_empty()) {
        missing.push(PeriodField::Name);
    }

    for kind in RangeKind::ALL {
        let range = draft_range(draft, kind);
        if range.and_then(|r| r.start).is_none() {
            missing.push(PeriodField::Start(kind));
        }
        if range.and_then(|r| r.end).is_none() {
            missing.push(PeriodField::End(kind));
        }
    }

    missing
}

fn complete(draft: &PeriodDraft) -> Result<CompleteDraft<'_>, Vec<PeriodField>> {
    let bounds = |kind| -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let range = draft_range(draft, kind)?;
        Some((range.start?, range.end?))
    };

    let name_present = draft
        .name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());

    match (
        name_present,
        bounds(RangeKind::Preparation),
        bounds(RangeKind::Application),
        bounds(RangeKind::Interview),
    ) {
        (true, Some(preparation), Some(application), Some(interview)) => Ok(CompleteDraft {
            preparation: DateRange::new(preparation.0, preparation.1),
            application: DateRange::new(application.0, application.1),
            interview: DateRange::new(interview.0, interview.1),
            committees: draft.committees.as_deref().unwrap_or_default(),
            optional_committees: draft.optional_committees.as_deref().unwrap_or_default(),
        }),
        _ => Err(missing_fields(draft)),
    }
}

fn overlapping_committees(committees: &[String], optional: &[String]) -> Vec<String> {
    let required: HashSet<String> = committees.iter().map(|c| committee_key(c)).collect();
    let mut seen = HashSet::new();
    optional
        .iter()
        .filter(|committee| required.contains(&committee_key(committee)))
        .filter(|committee| seen.insert(committee_key(committee)))
        .cloned()
        .collect()
}

/// Every rule after field presence, in reporting order.
fn rule_violations(draft: &CompleteDraft<'_>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if draft.preparation.end > draft.application.start {
        errors.push(ValidationError::SequenceViolation(
            SequenceRule::PrepBeforeApplication,
        ));
    }
    if draft.application.end > draft.interview.start {
        errors.push(ValidationError::SequenceViolation(
            SequenceRule::ApplicationBeforeInterview,
        ));
    }

    for kind in RangeKind::ALL {
        if draft.range(kind).is_inverted() {
            errors.push(ValidationError::InvertedRange(kind));
        }
    }

    if draft.committees.is_empty() {
        errors.push(ValidationError::NoCommittee);
    }

    let overlap = overlapping_committees(draft.committees, draft.optional_committees);
    if !overlap.is_empty() {
        errors.push(ValidationError::CommitteeOverlap(overlap));
    }

    errors
}

/// Validate a draft, reporting the first rule it breaks.
pub fn validate(draft: &PeriodDraft) -> Result<(), ValidationError> {
    let complete = complete(draft).map_err(|missing| {
        // `complete` only fails when something is missing.
        ValidationError::MissingField(missing.first().copied().unwrap_or(PeriodField::Name))
    })?;

    match rule_violations(&complete).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Validate a draft, reporting every rule it breaks.
///
/// When fields are missing only those are reported, since none of the
/// remaining rules can be evaluated safely.
pub fn violations(draft: &PeriodDraft) -> Vec<ValidationError> {
    match complete(draft) {
        Ok(complete) => rule_violations(&complete),
        Err(missing) => missing
            .into_iter()
            .map(ValidationError::MissingField)
            .collect(),
    }
}

/// Validate and build the period the draft describes.
pub fn into_period(draft: PeriodDraft) -> Result<Period, ValidationError> {
    validate(&draft)?;

    let range = |range: Option<DraftRange>, kind| -> Result<DateRange, ValidationError> {
        let range = range.unwrap_or_default();
        match (range.start, range.end) {
            (Some(start), Some(end)) => Ok(DateRange::new(start, end)),
            (None, _) => Err(ValidationError::MissingField(PeriodField::Start(kind))),
            (_, None) => Err(ValidationError::MissingField(PeriodField::End(kind))),
        }
    };

    Ok(Period {
        name: draft.name.unwrap_or_default().trim().to_string(),
        preparation_period: range(draft.preparation_period, RangeKind::Preparation)?,
        application_period: range(draft.application_period, RangeKind::Application)?,
        interview_period: range(draft.interview_period, RangeKind::Interview)?,
        committees: draft.committees.unwrap_or_default(),
        optional_committees: draft.optional_committees.unwrap_or_default(),
    })
}
