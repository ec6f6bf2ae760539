use axum::{extract::{State, Path, Query}, response::IntoResponse, Json, http::StatusCode};
use chrono::Utc;
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{AssignSlotRequest, ClearSlotRequest, TimetableQuery};
use crate::api::dtos::responses::{SessionAvailability, SlotGenerationResponse};
use crate::domain::models::session::Session;
use crate::domain::services::{capacity, timetable};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_timetable(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimetableQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = match query.day.as_deref() {
        Some(day) => {
            if timetable::day_index(day).is_none() {
                return Err(AppError::Validation(format!("Unknown day code: {}", day)));
            }
            state.session_repo.list_by_day(day).await?
        }
        None => state.session_repo.list_all().await?,
    };
    let activities = state.activity_repo.list().await?;

    let grid = timetable::render_grid(&sessions, &activities, query.day.as_deref());
    Ok(Json(grid))
}

/// Create an empty session row for every (day, slot) pair the current
/// opening hours admit. Idempotent: existing rows are left alone.
pub async fn generate_slots(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let windows = state.opening_hour_repo.list().await?;
    let slots: Vec<Session> = timetable::admissible_slots(&windows)
        .into_iter()
        .map(|(day, start_time)| Session::empty(day, start_time))
        .collect();

    let created = state.session_repo.ensure_slots(&slots).await?;

    info!("Slot generation created {} new session row(s)", created);

    Ok(Json(SlotGenerationResponse { created }))
}

pub async fn assign_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<AssignSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    if timetable::day_index(&payload.day).is_none() {
        return Err(AppError::Validation(format!("Unknown day code: {}", payload.day)));
    }
    if timetable::slot_index(&payload.start_time).is_none() {
        return Err(AppError::Validation(format!(
            "Unrecognized slot time: {}",
            payload.start_time
        )));
    }

    let activity = state.activity_repo.find_by_id(&payload.activity_id).await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    let needed = timetable::slots_needed(activity.duration_min);
    let run = timetable::slot_run(&payload.start_time, needed)
        .ok_or_else(|| AppError::SchedulingConflict(format!(
            "Activity needs {} slot(s) and does not fit starting at {}",
            needed, payload.start_time
        )))?;

    let windows = state.opening_hour_repo.list_by_day(&payload.day).await?;
    for slot in &run {
        if !timetable::within_opening_hours(&windows, &payload.day, slot) {
            return Err(AppError::SchedulingConflict(format!(
                "Slot {} {} is outside opening hours",
                payload.day, slot
            )));
        }
    }

    let sessions = state.session_repo
        .assign_activity(&payload.day, &run, &activity.id)
        .await?;

    info!(
        "Assigned activity {} to {} slot(s) on {} from {}",
        activity.id, sessions.len(), payload.day, payload.start_time
    );

    Ok(Json(sessions))
}

pub async fn clear_slot(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<ClearSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session_repo
        .clear_activity(&payload.day, &payload.start_time, payload.force)
        .await?;

    info!("Cleared slot {} {} (force: {})", payload.day, payload.start_time, payload.force);

    Ok(Json(session))
}

async fn availability_for(
    state: &AppState,
    sessions: Vec<Session>,
) -> Result<Vec<SessionAvailability>, AppError> {
    let activities = state.activity_repo.list().await?;
    let mut out = Vec::with_capacity(sessions.len());

    for session in sessions {
        let activity = session.activity_id.as_deref()
            .and_then(|id| activities.iter().find(|a| a.id == id));
        let occupancy = state.booking_repo.occupancy(&session.id).await?;
        let max_number = activity.map(|a| a.max_number);

        out.push(SessionAvailability {
            id: session.id,
            day: session.day,
            start_time: session.start_time,
            activity_id: session.activity_id,
            activity_name: activity.map(|a| a.name.clone()),
            occupancy,
            available_places: capacity::remaining(max_number, occupancy),
            is_full: capacity::is_full(max_number, occupancy),
        });
    }

    Ok(out)
}

pub async fn list_activity_sessions(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.activity_repo.find_by_id(&activity_id).await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    let sessions = state.session_repo.list_by_activity(&activity_id).await?;
    let availability = availability_for(&state, sessions).await?;
    Ok(Json(availability))
}

pub async fn sessions_today(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let today = timetable::day_code_for(Utc::now().date_naive());
    let sessions = state.session_repo.list_by_day(today).await?;
    let availability = availability_for(&state, sessions).await?;
    Ok(Json(availability))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.session_repo.find_by_id(&session_id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;
    let mut availability = availability_for(&state, vec![session]).await?;
    let single = availability.pop().ok_or(AppError::Internal)?;
    Ok((StatusCode::OK, Json(single)))
}
