mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp, ADMIN_PASSWORD};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn authed_post(app: &TestApp, auth: &AuthHeaders, uri: &str, body: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(uri)
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string())).unwrap()
    ).await.unwrap()
}

async fn open_all_day(app: &TestApp, auth: &AuthHeaders, day: &str) {
    let res = authed_post(app, auth, "/api/v1/opening-hours", json!({
        "day": day, "open_time": "08:00", "close_time": "20:00"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

async fn create_activity(app: &TestApp, auth: &AuthHeaders, name: &str, max_number: i32, duration_min: i32) -> String {
    let res = authed_post(app, auth, "/api/v1/activities", json!({
        "name": name, "max_number": max_number, "price_pence": 750, "duration_min": duration_min
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_grid_is_total() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/timetable")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let grid = parse_body(res).await;
    assert_eq!(grid.as_array().unwrap().len(), 7);
    for day in grid.as_array().unwrap() {
        assert_eq!(day["slots"].as_array().unwrap().len(), 13);
        for cell in day["slots"].as_array().unwrap() {
            assert!(cell["session_id"].is_null());
        }
    }
}

#[tokio::test]
async fn test_grid_rejects_unknown_day_filter() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/timetable?day=Funday")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slot_generation_is_idempotent() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    open_all_day(&app, &auth, "Mon").await;

    let first = authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;
    assert_eq!(first.status(), StatusCode::OK);
    // 08:00 through 19:00 fit whole hours before a 20:00 close
    assert_eq!(parse_body(first).await["created"], 12);

    let second = authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;
    assert_eq!(parse_body(second).await["created"], 0);
}

#[tokio::test]
async fn test_assign_single_slot_shows_in_grid() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    open_all_day(&app, &auth, "Tue").await;
    authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;

    let activity_id = create_activity(&app, &auth, "Aqua Fit", 10, 60).await;

    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Tue", "start_time": "10:00", "activity_id": activity_id
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let sessions = parse_body(res).await;
    assert_eq!(sessions.as_array().unwrap().len(), 1);

    let grid_res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/timetable?day=Tue")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let grid = parse_body(grid_res).await;
    let cell = grid[0]["slots"].as_array().unwrap().iter()
        .find(|c| c["start_time"] == "10:00").unwrap();
    assert_eq!(cell["activity_name"], "Aqua Fit");
}

#[tokio::test]
async fn test_assign_long_activity_occupies_consecutive_slots() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    open_all_day(&app, &auth, "Wed").await;
    authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;

    // 90 minutes rounds up to two slots
    let activity_id = create_activity(&app, &auth, "Deep Water", 8, 90).await;

    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Wed", "start_time": "14:00", "activity_id": activity_id
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let sessions = parse_body(res).await;
    let times: Vec<&str> = sessions.as_array().unwrap().iter()
        .map(|s| s["start_time"].as_str().unwrap()).collect();
    assert_eq!(times, vec!["14:00", "15:00"]);
}

#[tokio::test]
async fn test_assign_rejected_when_run_walks_off_grid() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    open_all_day(&app, &auth, "Thu").await;
    authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;

    let activity_id = create_activity(&app, &auth, "Marathon Swim", 5, 360).await;

    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Thu", "start_time": "16:00", "activity_id": activity_id
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("does not fit"));
}

#[tokio::test]
async fn test_assign_rejected_outside_opening_hours() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let res = authed_post(&app, &auth, "/api/v1/opening-hours", json!({
        "day": "Fri", "open_time": "09:00", "close_time": "12:00"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;

    let activity_id = create_activity(&app, &auth, "Lane Swim", 20, 60).await;

    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Fri", "start_time": "14:00", "activity_id": activity_id
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("outside opening hours"));
}

#[tokio::test]
async fn test_assign_rejected_when_slot_already_taken() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    open_all_day(&app, &auth, "Sat").await;
    authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;

    let first = create_activity(&app, &auth, "First", 10, 60).await;
    let second = create_activity(&app, &auth, "Second", 10, 60).await;

    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Sat", "start_time": "09:00", "activity_id": first
    })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Sat", "start_time": "09:00", "activity_id": second
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("already has an activity"));
}

#[tokio::test]
async fn test_assign_rejects_unrecognized_slot_time() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let activity_id = create_activity(&app, &auth, "Odd Start", 10, 60).await;

    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Mon", "start_time": "10:30", "activity_id": activity_id
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_with_bookings_requires_force() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    open_all_day(&app, &auth, "Sun").await;
    authed_post(&app, &auth, "/api/v1/timetable/slots/generate", json!({})).await;

    let activity_id = create_activity(&app, &auth, "Family Swim", 10, 60).await;
    let res = authed_post(&app, &auth, "/api/v1/timetable/assign", json!({
        "day": "Sun", "start_time": "11:00", "activity_id": activity_id
    })).await;
    let session_id = parse_body(res).await[0]["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "session_id": session_id, "pitch_number": "P1",
                "first_name": "Ann", "last_name": "Lee", "email": "ann@example.com",
                "number_of_people": 3
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = authed_post(&app, &auth, "/api/v1/timetable/clear", json!({
        "day": "Sun", "start_time": "11:00"
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = authed_post(&app, &auth, "/api/v1/timetable/clear", json!({
        "day": "Sun", "start_time": "11:00", "force": true
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = parse_body(res).await;
    assert!(cleared["activity_id"].is_null());

    // Force-clearing removed the slot's bookings too
    let list = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/sessions/{}/bookings", session_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(parse_body(list).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_overlapping_opening_windows_rejected() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;

    let res = authed_post(&app, &auth, "/api/v1/opening-hours", json!({
        "day": "Mon", "open_time": "08:00", "close_time": "12:00"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = authed_post(&app, &auth, "/api/v1/opening-hours", json!({
        "day": "Mon", "open_time": "11:00", "close_time": "15:00"
    })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Touching windows are fine
    let res = authed_post(&app, &auth, "/api/v1/opening-hours", json!({
        "day": "Mon", "open_time": "12:00", "close_time": "15:00"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_opening_window_must_open_before_close() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;

    let res = authed_post(&app, &auth, "/api/v1/opening-hours", json!({
        "day": "Tue", "open_time": "14:00", "close_time": "09:00"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
