mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{TestApp, ADMIN_PASSWORD, STAFF_PASSWORD};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "username": "admin", "password": "not-the-password"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_unknown_user() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "username": "nobody", "password": "whatever"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mutation_requires_csrf_header() {
    let app = TestApp::new().await;
    let auth = app.login("admin", ADMIN_PASSWORD).await;

    // Cookie present but no X-CSRF-Token
    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/activities")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Aqua Fit", "max_number": 10, "price_pence": 500, "duration_min": 60
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_protected_route_requires_cookie() {
    let app = TestApp::new().await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/activities")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Aqua Fit", "max_number": 10, "price_pence": 500, "duration_min": 60
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_staff_can_use_protected_routes() {
    let app = TestApp::new().await;
    let auth = app.login("staff", STAFF_PASSWORD).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/activities")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Lane Swim", "max_number": 20, "price_pence": 300, "duration_min": 60
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}
