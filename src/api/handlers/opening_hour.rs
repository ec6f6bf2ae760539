use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use chrono::NaiveTime;
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::OpeningHourRequest;
use crate::domain::models::opening_hour::OpeningHour;
use crate::domain::services::timetable;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn parse_window(payload: &OpeningHourRequest) -> Result<(NaiveTime, NaiveTime), AppError> {
    if timetable::day_index(&payload.day).is_none() {
        return Err(AppError::Validation(format!("Unknown day code: {}", payload.day)));
    }
    let open = NaiveTime::parse_from_str(&payload.open_time, "%H:%M")
        .map_err(|_| AppError::Validation("open_time must be HH:MM".into()))?;
    let close = NaiveTime::parse_from_str(&payload.close_time, "%H:%M")
        .map_err(|_| AppError::Validation("close_time must be HH:MM".into()))?;
    if open >= close {
        return Err(AppError::Validation("open_time must be before close_time".into()));
    }
    Ok((open, close))
}

/// Windows on the same day must not overlap. Touching endpoints are fine.
fn check_disjoint(
    existing: &[OpeningHour],
    day: &str,
    open: NaiveTime,
    close: NaiveTime,
    exclude_id: Option<&str>,
) -> Result<(), AppError> {
    for window in existing {
        if window.day != day || exclude_id == Some(window.id.as_str()) {
            continue;
        }
        let (Ok(w_open), Ok(w_close)) = (
            NaiveTime::parse_from_str(&window.open_time, "%H:%M"),
            NaiveTime::parse_from_str(&window.close_time, "%H:%M"),
        ) else {
            continue;
        };
        if open < w_close && w_open < close {
            return Err(AppError::Conflict(format!(
                "Window overlaps existing {} {}-{}",
                window.day, window.open_time, window.close_time
            )));
        }
    }
    Ok(())
}

pub async fn create_opening_hour(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<OpeningHourRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (open, close) = parse_window(&payload)?;

    let existing = state.opening_hour_repo.list_by_day(&payload.day).await?;
    check_disjoint(&existing, &payload.day, open, close, None)?;

    let window = OpeningHour::new(payload.day, payload.open_time, payload.close_time);
    let created = state.opening_hour_repo.create(&window).await?;

    info!("Opening window created: {} {}-{}", created.day, created.open_time, created.close_time);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_opening_hours(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let windows = state.opening_hour_repo.list().await?;
    Ok(Json(windows))
}

pub async fn update_opening_hour(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(window_id): Path<String>,
    Json(payload): Json<OpeningHourRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut window = state.opening_hour_repo.find_by_id(&window_id).await?
        .ok_or(AppError::NotFound("Opening hour not found".into()))?;

    let (open, close) = parse_window(&payload)?;
    let existing = state.opening_hour_repo.list_by_day(&payload.day).await?;
    check_disjoint(&existing, &payload.day, open, close, Some(&window_id))?;

    window.day = payload.day;
    window.open_time = payload.open_time;
    window.close_time = payload.close_time;

    let updated = state.opening_hour_repo.update(&window).await?;
    Ok(Json(updated))
}

pub async fn delete_opening_hour(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(window_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.opening_hour_repo.delete(&window_id).await?;

    info!("Opening window deleted: {}", window_id);

    Ok(StatusCode::NO_CONTENT)
}
