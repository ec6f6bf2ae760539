use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateActivityRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_number: i32,
    pub price_pence: i64,
    pub duration_min: i32,
}

#[derive(Deserialize)]
pub struct UpdateActivityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub max_number: Option<i32>,
    pub price_pence: Option<i64>,
    pub duration_min: Option<i32>,
}

#[derive(Deserialize)]
pub struct OpeningHourRequest {
    pub day: String,
    pub open_time: String,
    pub close_time: String,
}

#[derive(Deserialize)]
pub struct AssignSlotRequest {
    pub day: String,
    pub start_time: String,
    pub activity_id: String,
}

#[derive(Deserialize)]
pub struct ClearSlotRequest {
    pub day: String,
    pub start_time: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Deserialize)]
pub struct TimetableQuery {
    pub day: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub session_id: String,
    pub pitch_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_of_people: i32,
}

#[derive(Deserialize)]
pub struct StaffCreateBookingRequest {
    pub session_id: String,
    pub pitch_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number_of_people: i32,
    /// Book past capacity. Superuser only.
    #[serde(default)]
    pub override_capacity: bool,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub pitch_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub number_of_people: Option<i32>,
    #[serde(default)]
    pub override_capacity: bool,
}

#[derive(Deserialize)]
pub struct SweepRequest {
    /// Cutoff date. Occurrences strictly before this are archived.
    /// Defaults to today.
    pub as_of: Option<NaiveDate>,
}
