use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateBookingRequest, StaffCreateBookingRequest, UpdateBookingRequest};
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

fn validate_guest(pitch_number: &str, email: &str, number_of_people: i32) -> Result<(), AppError> {
    if pitch_number.trim().is_empty() {
        return Err(AppError::Validation("pitch_number cannot be empty".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if number_of_people < 1 {
        return Err(AppError::Validation("number_of_people must be at least 1".into()));
    }
    Ok(())
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_guest(&payload.pitch_number, &payload.email, payload.number_of_people)?;

    let booking = Booking::new(NewBookingParams {
        session_id: payload.session_id,
        pitch_number: payload.pitch_number,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        number_of_people: payload.number_of_people,
    });

    let created = state.booking_repo.create(&booking, true).await?;

    info!(
        "Booking created: {} (session {}, party of {})",
        created.id, created.session_id, created.number_of_people
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Staff booking entry. With `override_capacity` a superuser can book past a
/// full session; the occupancy then simply reads over capacity.
pub async fn staff_create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<StaffCreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_guest(&payload.pitch_number, &payload.email, payload.number_of_people)?;

    if payload.override_capacity && !user.is_superuser() {
        return Err(AppError::Forbidden("Capacity override requires superuser".into()));
    }

    let booking = Booking::new(NewBookingParams {
        session_id: payload.session_id,
        pitch_number: payload.pitch_number,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        number_of_people: payload.number_of_people,
    });

    let enforce_capacity = !payload.override_capacity;
    let created = state.booking_repo.create(&booking, enforce_capacity).await?;

    if payload.override_capacity {
        warn!(
            "Capacity override by {}: booking {} on session {}",
            user.id, created.id, created.session_id
        );
    }

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_session_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.session_repo.find_by_id(&session_id).await?
        .ok_or(AppError::NotFound("Session not found".into()))?;

    let bookings = state.booking_repo.list_by_session(&session_id).await?;
    Ok(Json(bookings))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.override_capacity && !user.is_superuser() {
        return Err(AppError::Forbidden("Capacity override requires superuser".into()));
    }

    let mut booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if let Some(pitch_number) = payload.pitch_number {
        booking.pitch_number = pitch_number;
    }
    if let Some(first_name) = payload.first_name {
        booking.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        booking.last_name = last_name;
    }
    if let Some(email) = payload.email {
        booking.email = email;
    }
    if let Some(number_of_people) = payload.number_of_people {
        booking.number_of_people = number_of_people;
    }
    validate_guest(&booking.pitch_number, &booking.email, booking.number_of_people)?;

    let enforce_capacity = !payload.override_capacity;
    let updated = state.booking_repo.update(&booking, enforce_capacity).await?;
    Ok(Json(updated))
}

/// Attendance is one-way. Re-marking an attended booking is a no-op.
pub async fn mark_attended(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.mark_attended(&booking_id).await?;

    info!("Booking marked attended: {}", booking.id);

    Ok(Json(booking))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_repo.delete(&booking_id).await?;

    info!("Booking deleted: {}", booking_id);

    Ok(StatusCode::NO_CONTENT)
}
