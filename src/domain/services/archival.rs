use chrono::{Days, NaiveDate};
use tracing::{info, warn};

use crate::domain::ports::{ActivityRepository, ArchiveRepository, SessionRepository};
use crate::domain::services::timetable;
use crate::error::AppError;

/// The most recent calendar date strictly before `as_of` that falls on the
/// given weekday code. None for an unrecognized code.
pub fn occurrence_before(day: &str, as_of: NaiveDate) -> Option<NaiveDate> {
    timetable::day_index(day)?;
    (1..=7u64)
        .filter_map(|back| as_of.checked_sub_days(Days::new(back)))
        .find(|candidate| timetable::day_code_for(*candidate) == day)
}

/// Archive every assigned session's latest occurrence before `as_of`.
/// Occurrences already archived are skipped, so re-running with the same
/// cutoff archives nothing new.
pub async fn run_sweep(
    sessions: &dyn SessionRepository,
    activities: &dyn ActivityRepository,
    archive: &dyn ArchiveRepository,
    as_of: NaiveDate,
) -> Result<u64, AppError> {
    let mut archived = 0u64;

    for session in sessions.list_all().await? {
        let Some(activity_id) = session.activity_id.clone() else {
            continue;
        };
        let Some(session_date) = occurrence_before(&session.day, as_of) else {
            warn!("Skipping session {} with unrecognized day {}", session.id, session.day);
            continue;
        };

        let activity = activities
            .find_by_id(&activity_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        if archive.archive_occurrence(&session, &activity, session_date).await? {
            info!(
                "Archived session {} ({} {}) for {}",
                session.id, session.day, session.start_time, session_date
            );
            archived += 1;
        }
    }

    Ok(archived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrence_is_strictly_before_cutoff() {
        // 2026-08-24 is a Monday
        let monday = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        // A Monday session swept on Monday resolves to the previous week
        assert_eq!(occurrence_before("Mon", monday), NaiveDate::from_ymd_opt(2026, 8, 17));
        // Swept on Tuesday it resolves to the day before
        let tuesday = monday.succ_opt().unwrap();
        assert_eq!(occurrence_before("Mon", tuesday), Some(monday));
    }

    #[test]
    fn unknown_day_has_no_occurrence() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(occurrence_before("Funday", date), None);
    }
}
