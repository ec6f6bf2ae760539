use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{activity, archive, auth, booking, health, opening_hour, timetable};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Activity catalog
        .route("/api/v1/activities", post(activity::create_activity).get(activity::list_activities))
        .route("/api/v1/activities/{activity_id}", get(activity::get_activity).put(activity::update_activity).delete(activity::delete_activity))
        .route("/api/v1/activities/{activity_id}/sessions", get(timetable::list_activity_sessions))

        // Opening hours
        .route("/api/v1/opening-hours", post(opening_hour::create_opening_hour).get(opening_hour::list_opening_hours))
        .route("/api/v1/opening-hours/{window_id}", put(opening_hour::update_opening_hour).delete(opening_hour::delete_opening_hour))

        // Timetable grid
        .route("/api/v1/timetable", get(timetable::get_timetable))
        .route("/api/v1/timetable/slots/generate", post(timetable::generate_slots))
        .route("/api/v1/timetable/assign", post(timetable::assign_slot))
        .route("/api/v1/timetable/clear", post(timetable::clear_slot))

        // Sessions & availability
        .route("/api/v1/sessions/today", get(timetable::sessions_today))
        .route("/api/v1/sessions/{session_id}", get(timetable::get_session))
        .route("/api/v1/sessions/{session_id}/bookings", get(booking::list_session_bookings))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking))
        .route("/api/v1/staff/bookings", post(booking::staff_create_booking))
        .route("/api/v1/bookings/{booking_id}", put(booking::update_booking).delete(booking::delete_booking))
        .route("/api/v1/bookings/{booking_id}/attend", post(booking::mark_attended))

        // Archive
        .route("/api/v1/archive/sweep", post(archive::run_sweep))
        .route("/api/v1/archive/sessions", get(archive::list_archived_sessions))
        .route("/api/v1/archive/sessions/{historical_session_id}/bookings", get(archive::list_archived_bookings))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
