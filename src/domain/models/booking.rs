use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub session_id: String,
    pub pitch_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_of_people: i32,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub session_id: String,
    pub pitch_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_of_people: i32,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: params.session_id,
            pitch_number: params.pitch_number,
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            number_of_people: params.number_of_people,
            attended: false,
            created_at: Utc::now(),
        }
    }
}
