use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One opening window for a weekday. A day may have several disjoint windows.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OpeningHour {
    pub id: String,
    pub day: String,
    pub open_time: String,
    pub close_time: String,
}

impl OpeningHour {
    pub fn new(day: String, open_time: String, close_time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            day,
            open_time,
            close_time,
        }
    }
}
