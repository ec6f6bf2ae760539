use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One timetable cell: a (day, start_time) pair, unique across the grid.
/// Rows are pre-created empty for every slot inside opening hours and
/// mutated in place when an activity is assigned.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Session {
    pub id: String,
    pub day: String,
    pub start_time: String,
    pub activity_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn empty(day: String, start_time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day,
            start_time,
            activity_id: None,
            created_at: Utc::now(),
        }
    }
}
