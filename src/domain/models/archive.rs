use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Snapshot of one weekly occurrence of a session, written once by the
/// archival sweep. `(session_id, session_date)` is unique, which is what
/// makes the sweep safe to re-run.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct HistoricalSession {
    pub id: String,
    pub session_id: String,
    pub session_date: NaiveDate,
    pub day: String,
    pub start_time: String,
    pub activity_id: String,
    pub activity_name: String,
    pub total_booked: i64,
    pub archived_at: DateTime<Utc>,
}

impl HistoricalSession {
    pub fn new(
        session_id: String,
        session_date: NaiveDate,
        day: String,
        start_time: String,
        activity_id: String,
        activity_name: String,
        total_booked: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id,
            session_date,
            day,
            start_time,
            activity_id,
            activity_name,
            total_booked,
            archived_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct HistoricalBooking {
    pub id: String,
    pub historical_session_id: String,
    pub pitch_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_of_people: i32,
    pub attended: bool,
    pub booked_at: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
}
