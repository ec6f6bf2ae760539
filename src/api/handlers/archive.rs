use axum::{extract::{State, Path}, response::IntoResponse, Json};
use chrono::Utc;
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::SweepRequest;
use crate::api::dtos::responses::SweepResponse;
use crate::domain::services::archival;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn run_sweep(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<SweepRequest>,
) -> Result<impl IntoResponse, AppError> {
    let as_of = payload.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let archived = archival::run_sweep(
        state.session_repo.as_ref(),
        state.activity_repo.as_ref(),
        state.archive_repo.as_ref(),
        as_of,
    )
    .await?;

    info!("Manual sweep by {} archived {} occurrence(s) before {}", user.id, archived, as_of);

    Ok(Json(SweepResponse { archived }))
}

pub async fn list_archived_sessions(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.archive_repo.list_sessions().await?;
    Ok(Json(sessions))
}

pub async fn list_archived_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(historical_session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.archive_repo.list_bookings(&historical_session_id).await?;
    Ok(Json(bookings))
}
