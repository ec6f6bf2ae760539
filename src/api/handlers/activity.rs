use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateActivityRequest, UpdateActivityRequest};
use crate::domain::models::activity::Activity;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn validate_fields(max_number: i32, price_pence: i64, duration_min: i32) -> Result<(), AppError> {
    if max_number < 1 {
        return Err(AppError::Validation("max_number must be at least 1".into()));
    }
    if price_pence < 0 {
        return Err(AppError::Validation("price_pence cannot be negative".into()));
    }
    if duration_min < 1 {
        return Err(AppError::Validation("duration_min must be at least 1".into()));
    }
    Ok(())
}

pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Activity name cannot be empty".into()));
    }
    validate_fields(payload.max_number, payload.price_pence, payload.duration_min)?;

    let activity = Activity::new(
        payload.name,
        payload.description,
        payload.max_number,
        payload.price_pence,
        payload.duration_min,
    );
    let created = state.activity_repo.create(&activity).await?;

    info!("Activity created: {} ({})", created.name, created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let activities = state.activity_repo.list().await?;
    Ok(Json(activities))
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state.activity_repo.find_by_id(&activity_id).await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;
    Ok(Json(activity))
}

pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(activity_id): Path<String>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut activity = state.activity_repo.find_by_id(&activity_id).await?
        .ok_or(AppError::NotFound("Activity not found".into()))?;

    // Capacity and duration freeze once live bookings exist. Shrinking either
    // under existing bookings would silently strand them.
    let live_bookings = state.booking_repo.count_for_activity(&activity_id).await?;
    if live_bookings > 0 {
        let capacity_changed = payload.max_number.is_some_and(|m| m != activity.max_number);
        let duration_changed = payload.duration_min.is_some_and(|d| d != activity.duration_min);
        if capacity_changed || duration_changed {
            return Err(AppError::Conflict(format!(
                "Activity has {} live booking(s); capacity and duration cannot change",
                live_bookings
            )));
        }
    }

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Activity name cannot be empty".into()));
        }
        activity.name = name;
    }
    if let Some(description) = payload.description {
        activity.description = description;
    }
    if let Some(max_number) = payload.max_number {
        activity.max_number = max_number;
    }
    if let Some(price_pence) = payload.price_pence {
        activity.price_pence = price_pence;
    }
    if let Some(duration_min) = payload.duration_min {
        activity.duration_min = duration_min;
    }
    validate_fields(activity.max_number, activity.price_pence, activity.duration_min)?;

    let updated = state.activity_repo.update(&activity).await?;
    Ok(Json(updated))
}

pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(activity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let assigned = state.session_repo.count_by_activity(&activity_id).await?;
    if assigned > 0 {
        return Err(AppError::Conflict(format!(
            "Activity is assigned to {} timetable slot(s); clear them first",
            assigned
        )));
    }

    state.activity_repo.delete(&activity_id).await?;

    info!("Activity deleted: {}", activity_id);

    Ok(StatusCode::NO_CONTENT)
}
