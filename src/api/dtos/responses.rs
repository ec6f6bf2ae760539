use serde::Serialize;

/// A session enriched with live availability, always derived from the
/// booking set at read time.
#[derive(Serialize)]
pub struct SessionAvailability {
    pub id: String,
    pub day: String,
    pub start_time: String,
    pub activity_id: Option<String>,
    pub activity_name: Option<String>,
    pub occupancy: i64,
    pub available_places: i64,
    pub is_full: bool,
}

#[derive(Serialize)]
pub struct SlotGenerationResponse {
    pub created: u64,
}

#[derive(Serialize)]
pub struct SweepResponse {
    pub archived: u64,
}
