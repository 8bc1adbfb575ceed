use crate::common;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use serde_json::json;
use serial_test::serial;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower::ServiceExt;

#[tokio::test]
#[serial]
async fn test_rate_limit_on_auth_routes() {
    // 2 requests per minute for this test only
    unsafe {
        std::env::set_var("RATE_LIMIT_PER_MINUTE", "2");
    }

    let pool = match common::setup_test_db().await {
        Ok(p) => p,
        Err(_) => {
            eprintln!("Skipping test_rate_limit_on_auth_routes: database not available");
            unsafe {
                std::env::remove_var("RATE_LIMIT_PER_MINUTE");
            }
            return;
        }
    };
    common::cleanup_test_db(&pool).await;

    let state = common::create_test_app_state(pool.clone());
    let app = restobook_auth::presentation::router::app(state).unwrap();

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 12345);
    let login_body = json!({ "email": "jean@example.com", "password": "password123" });

    let request = |body: String| {
        Request::builder()
            .uri("/api/v1/auth/login")
            .method("POST")
            .header("content-type", "application/json")
            .extension(ConnectInfo(addr))
            .body(Body::from(body))
            .unwrap()
    };

    // The first two attempts pass the limiter (and fail on credentials)
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(request(login_body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // The third is throttled before it reaches the handler
    let response = app
        .clone()
        .oneshot(request(login_body.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Unauthenticated internal routes are not rate limited
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/internal/validate")
                .extension(ConnectInfo(addr))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    common::cleanup_test_db(&pool).await;
    unsafe {
        std::env::remove_var("RATE_LIMIT_PER_MINUTE");
    }
}
