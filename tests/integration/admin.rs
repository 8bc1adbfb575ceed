use crate::common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use restobook_auth::domain::auth::TokenCodec;
use restobook_auth::domain::users::{Role, User};
use serde_json::json;
use serial_test::serial;
use time::OffsetDateTime;
use tower::ServiceExt;

fn test_app(pool: sqlx::PgPool) -> Router {
    let state = common::create_test_app_state(pool);
    restobook_auth::presentation::router::app(state).expect("Failed to build test router")
}

fn token_for(id: i64, email: &str, role: Role) -> String {
    let now = OffsetDateTime::now_utc();
    let user = User {
        id,
        first_name: "Admin".to_string(),
        last_name: "Test".to_string(),
        email: email.to_string(),
        password_hash: "irrelevant".to_string(),
        role,
        enabled: true,
        account_non_locked: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    };
    common::create_test_codec().issue(&user).unwrap()
}

async fn post(app: &Router, uri: &str, bearer: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri).method("POST");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn test_force_logout_all_requires_admin_role() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let client_id = common::seed_user(&pool, "client@example.com", "password123", Role::Client).await;
    let target_id = common::seed_user(&pool, "target@example.com", "password123", Role::Client).await;
    let app = test_app(pool.clone());

    let token = token_for(client_id, "client@example.com", Role::Client);
    let response = post(
        &app,
        &format!("/api/v1/admin/users/{}/logout-all", target_id),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_force_logout_all_revokes_target_sessions() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let admin_id = common::seed_user(&pool, "admin@example.com", "password123", Role::Admin).await;
    let target_id = common::seed_user(&pool, "target@example.com", "password123", Role::Client).await;
    let app = test_app(pool.clone());

    // Target opens a session
    let login = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/login")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "email": "target@example.com", "password": "password123" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let body = axum::body::to_bytes(login.into_body(), usize::MAX)
        .await
        .unwrap();
    let session: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let refresh = session["refreshToken"].as_str().unwrap().to_string();

    // Admin revokes everything the target holds
    let token = token_for(admin_id, "admin@example.com", Role::Admin);
    let response = post(
        &app,
        &format!("/api/v1/admin/users/{}/logout-all", target_id),
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The target's refresh token is dead
    let replay = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/refresh")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "refreshToken": refresh }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_force_logout_all_rejected_for_disabled_admin() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let admin_id = common::seed_user(&pool, "admin@example.com", "password123", Role::Admin).await;
    let target_id = common::seed_user(&pool, "target@example.com", "password123", Role::Client).await;
    let app = test_app(pool.clone());

    // Token signed before the admin account was disabled
    let token = token_for(admin_id, "admin@example.com", Role::Admin);
    sqlx::query("UPDATE users SET enabled = FALSE WHERE id = $1")
        .bind(admin_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = post(
        &app,
        &format!("/api/v1/admin/users/{}/logout-all", target_id),
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_force_logout_all_unknown_user() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let admin_id = common::seed_user(&pool, "admin@example.com", "password123", Role::Admin).await;
    let app = test_app(pool.clone());

    let token = token_for(admin_id, "admin@example.com", Role::Admin);
    let response = post(&app, "/api/v1/admin/users/424242/logout-all", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    common::cleanup_test_db(&pool).await;
}
