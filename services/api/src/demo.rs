use crate::infra::InMemoryPeriodRepository;
use chrono::{DateTime, Duration, NaiveTime, Utc, Weekday};
use clap::Args;
use opptak::config::AppConfig;
use opptak::error::AppError;
use opptak::recruitment::schedule::{PointerEvent, SlotBook, SlotSelectionSession, TimeSlotGrid};
use opptak::recruitment::{
    validate, violations, DateRange, DraftRange, PeriodDraft, PeriodService, PeriodServiceError,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a period draft in JSON form
    pub(crate) path: PathBuf,
    /// Report every broken rule instead of stopping at the first
    #[arg(long)]
    pub(crate) all: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SlotsArgs {
    /// First interview start (HH:MM). Defaults to the configured day start.
    #[arg(long, value_parser = crate::infra::parse_time)]
    pub(crate) day_start: Option<NaiveTime>,
    /// End of the interview day (HH:MM). Defaults to the configured day end.
    #[arg(long, value_parser = crate::infra::parse_time)]
    pub(crate) day_end: Option<NaiveTime>,
    /// Interview length in minutes.
    #[arg(long)]
    pub(crate) minutes: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs { path, all } = args;
    let raw = std::fs::read_to_string(&path)?;
    let draft: PeriodDraft = serde_json::from_str(&raw)?;

    if all {
        let found = violations(&draft);
        if found.is_empty() {
            println!("{}: valid", path.display());
            return Ok(());
        }
        println!("{}: {} problem(s)", path.display(), found.len());
        for error in &found {
            println!("- [{}] {}", error.kind(), error);
        }
        let first = found.into_iter().next();
        return match first {
            Some(error) => Err(AppError::Period(PeriodServiceError::Validation(error))),
            None => Ok(()),
        };
    }

    match validate(&draft) {
        Ok(()) => {
            println!("{}: valid", path.display());
            Ok(())
        }
        Err(error) => {
            println!("{}: [{}] {}", path.display(), error.kind(), error);
            Err(AppError::Period(PeriodServiceError::Validation(error)))
        }
    }
}

pub(crate) fn run_slots(args: SlotsArgs) -> Result<(), AppError> {
    let scheduling = AppConfig::load()?.scheduling;
    let day_start = args.day_start.unwrap_or(scheduling.day_start);
    let day_end = args.day_end.unwrap_or(scheduling.day_end);
    let minutes = args.minutes.unwrap_or(scheduling.interview_minutes);

    let grid = TimeSlotGrid::new(day_start, day_end, Duration::minutes(i64::from(minutes)))?;
    println!(
        "Interview slots {} -> {} ({} min): {}",
        day_start.format("%H:%M"),
        day_end.format("%H:%M"),
        minutes,
        grid.len()
    );
    for (index, slot) in grid.time_slots().iter().enumerate() {
        println!(
            "  {:>2}. {} - {}",
            index,
            slot.start.format("%H:%M"),
            slot.end.format("%H:%M")
        );
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let now = args.now.unwrap_or_else(Utc::now);

    println!("Recruitment period demo (evaluated {})", now.to_rfc3339());

    let service = PeriodService::new(
        Arc::new(InMemoryPeriodRepository::default()),
        config.access.policy(),
    );

    let draft = demo_draft(now);
    let mut overlapping = draft.clone();
    overlapping.optional_committees = Some(vec!["arrkom".to_string()]);
    match service.create(overlapping) {
        Ok(record) => println!("- Unexpectedly accepted overlapping draft {}", record.id),
        Err(error) => println!("- Rejected overlapping draft: {}", error),
    }

    let record = service.create(draft)?;
    println!(
        "- Created period {} ({})",
        record.period.name, record.id
    );

    let current = service.current(now)?;
    println!("\nCurrent periods: {}", current.len());
    for active in &current {
        println!(
            "- {} | applications open: {} | interviewing: {}",
            active.period.name,
            active.period.accepts_applications(now),
            active.period.is_interviewing(now)
        );
    }

    let memberships = ["Arrkom", "hovedstyret", "feminit"];
    let view = service.committee_access(&record.id, memberships, now)?;
    println!(
        "\nCommittees for a member of {}: {}",
        memberships.join(", "),
        view.committees.join(", ")
    );
    println!("Applicant access expired: {}", view.access_expired);

    let grid = TimeSlotGrid::new(
        config.scheduling.day_start,
        config.scheduling.day_end,
        config.scheduling.interview_length(),
    )?;
    println!("\nMonday interview grid ({} slots)", grid.len());

    let mut session = SlotSelectionSession::new(grid.len());
    let selections = session.replay([
        PointerEvent::Press {
            weekday: Weekday::Mon,
            index: 2,
        },
        PointerEvent::Move {
            weekday: Weekday::Mon,
            index: 5,
        },
        PointerEvent::Release {
            weekday: Weekday::Mon,
        },
        PointerEvent::Press {
            weekday: Weekday::Mon,
            index: 5,
        },
        PointerEvent::Release {
            weekday: Weekday::Mon,
        },
    ]);

    let mut book = SlotBook::default();
    for selection in &selections {
        let change = book.apply(selection);
        println!(
            "- Selected slots {}..={} (added {:?}, removed {:?})",
            selection.range.first, selection.range.last, change.added, change.removed
        );
    }

    println!("Offered on Monday:");
    for index in book.offered(Weekday::Mon) {
        if let Some(slot) = grid.slot_at(index) {
            println!(
                "  {:>2}. {} - {}",
                index,
                slot.start.format("%H:%M"),
                slot.end.format("%H:%M")
            );
        }
    }

    Ok(())
}

fn demo_draft(now: DateTime<Utc>) -> PeriodDraft {
    let range = |from: i64, to: i64| {
        DraftRange::from(DateRange::new(
            now + Duration::days(from),
            now + Duration::days(to),
        ))
    };

    PeriodDraft {
        name: Some("Opptak demo".to_string()),
        preparation_period: Some(range(-10, -5)),
        application_period: Some(range(-5, 5)),
        interview_period: Some(range(6, 20)),
        committees: Some(vec![
            "Arrkom".to_string(),
            "Bedkom".to_string(),
            "Dotkom".to_string(),
        ]),
        optional_committees: Some(vec!["FeminIT".to_string()]),
    }
}
