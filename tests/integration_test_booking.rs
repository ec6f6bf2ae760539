mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp, ADMIN_PASSWORD, STAFF_PASSWORD};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn authed_req(app: &TestApp, auth: &AuthHeaders, method: &str, uri: &str, body: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method(method).uri(uri)
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string())).unwrap()
    ).await.unwrap()
}

/// Open Monday, generate slots and assign one activity. Returns the
/// assigned session id.
async fn setup_session(app: &TestApp, auth: &AuthHeaders, max_number: i32) -> String {
    let res = authed_req(app, auth, "POST", "/api/v1/opening-hours", json!({
        "day": "Mon", "open_time": "08:00", "close_time": "20:00"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    authed_req(app, auth, "POST", "/api/v1/timetable/slots/generate", json!({})).await;

    let res = authed_req(app, auth, "POST", "/api/v1/activities", json!({
        "name": "Aqua Fit", "max_number": max_number, "price_pence": 500, "duration_min": 60
    })).await;
    let activity_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = authed_req(app, auth, "POST", "/api/v1/timetable/assign", json!({
        "day": "Mon", "start_time": "10:00", "activity_id": activity_id
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await[0]["id"].as_str().unwrap().to_string()
}

fn booking_payload(session_id: &str, pitch: &str, people: i32) -> Value {
    json!({
        "session_id": session_id, "pitch_number": pitch,
        "first_name": "Ann", "last_name": "Lee", "email": "ann@example.com",
        "number_of_people": people
    })
}

async fn public_book(app: &TestApp, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_booking_enforces_capacity() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &auth, 10).await;

    let res = public_book(&app, booking_payload(&session_id, "P1", 6)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = public_book(&app, booking_payload(&session_id, "P2", 4)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // 10 of 10 taken, even a party of one is refused
    let res = public_book(&app, booking_payload(&session_id, "P3", 1)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("full"));
}

#[tokio::test]
async fn test_availability_reflects_bookings() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &auth, 10).await;

    public_book(&app, booking_payload(&session_id, "P1", 7)).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/sessions/{}", session_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["occupancy"], 7);
    assert_eq!(body["available_places"], 3);
    assert_eq!(body["is_full"], false);
}

#[tokio::test]
async fn test_duplicate_pitch_rejected() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &auth, 10).await;

    let res = public_book(&app, booking_payload(&session_id, "P1", 2)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = public_book(&app, booking_payload(&session_id, "P1", 2)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("pitch"));
}

#[tokio::test]
async fn test_party_size_must_be_positive() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &auth, 10).await;

    let res = public_book(&app, booking_payload(&session_id, "P1", 0)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = public_book(&app, booking_payload(&session_id, "P1", -2)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unassigned_session_cannot_be_booked() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    setup_session(&app, &auth, 10).await;

    // Grab a generated but unassigned session from the grid
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/timetable?day=Mon")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let grid = parse_body(res).await;
    let empty_cell = grid[0]["slots"].as_array().unwrap().iter()
        .find(|c| !c["session_id"].is_null() && c["activity_id"].is_null())
        .expect("No unassigned session in grid");
    let session_id = empty_cell["session_id"].as_str().unwrap();

    let res = public_book(&app, booking_payload(session_id, "P1", 2)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = TestApp::new().await;

    let res = public_book(&app, booking_payload("no-such-session", "P1", 2)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attendance_is_one_way() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &auth, 10).await;

    let res = public_book(&app, booking_payload(&session_id, "P1", 2)).await;
    let booking_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = authed_req(&app, &auth, "POST", &format!("/api/v1/bookings/{}/attend", booking_id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["attended"], true);

    // Re-marking is a harmless no-op
    let res = authed_req(&app, &auth, "POST", &format!("/api/v1/bookings/{}/attend", booking_id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["attended"], true);
}

#[tokio::test]
async fn test_capacity_override_requires_superuser() {
    let app = TestApp::new().await;
    let admin = app.login("admin", ADMIN_PASSWORD).await;
    let staff = app.login("staff", STAFF_PASSWORD).await;
    let session_id = setup_session(&app, &admin, 4).await;

    public_book(&app, booking_payload(&session_id, "P1", 4)).await;

    let mut payload = booking_payload(&session_id, "P2", 2);
    payload["override_capacity"] = json!(true);

    let res = authed_req(&app, &staff, "POST", "/api/v1/staff/bookings", payload.clone()).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = authed_req(&app, &admin, "POST", "/api/v1/staff/bookings", payload).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Occupancy now reads over capacity
    let res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/sessions/{}", session_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let body = parse_body(res).await;
    assert_eq!(body["occupancy"], 6);
    assert_eq!(body["available_places"], -2);
    assert_eq!(body["is_full"], true);
}

#[tokio::test]
async fn test_staff_booking_without_override_still_capacity_checked() {
    let app = TestApp::new().await;
    let admin = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &admin, 4).await;

    public_book(&app, booking_payload(&session_id, "P1", 4)).await;

    let res = authed_req(&app, &admin, "POST", "/api/v1/staff/bookings", booking_payload(&session_id, "P2", 1)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_discounts_own_contribution() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &auth, 10).await;

    let res = public_book(&app, booking_payload(&session_id, "P1", 10)).await;
    let booking_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // Shrinking a booking on a full session must succeed
    let res = authed_req(&app, &auth, "PUT", &format!("/api/v1/bookings/{}", booking_id),
        json!({"number_of_people": 8})).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["number_of_people"], 8);

    // Growing past capacity must not
    let res = authed_req(&app, &auth, "PUT", &format!("/api/v1/bookings/{}", booking_id),
        json!({"number_of_people": 11})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_booking_frees_capacity() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;
    let session_id = setup_session(&app, &auth, 5).await;

    let res = public_book(&app, booking_payload(&session_id, "P1", 5)).await;
    let booking_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = public_book(&app, booking_payload(&session_id, "P2", 1)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = authed_req(&app, &auth, "DELETE", &format!("/api/v1/bookings/{}", booking_id), json!({})).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = public_book(&app, booking_payload(&session_id, "P2", 1)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}
