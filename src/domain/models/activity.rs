use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub max_number: i32,
    pub price_pence: i64,
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(name: String, description: String, max_number: i32, price_pence: i64, duration_min: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            max_number,
            price_pence,
            duration_min,
            created_at: Utc::now(),
        }
    }
}
