use crate::common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use restobook_auth::domain::auth::TokenCodec;
use restobook_auth::domain::users::{Role, User};
use serde_json::Value;
use serial_test::serial;
use time::OffsetDateTime;
use tower::ServiceExt;

fn test_app(pool: sqlx::PgPool) -> Router {
    let state = common::create_test_app_state(pool);
    restobook_auth::presentation::router::app(state).expect("Failed to build test router")
}

async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn stub_user(id: i64, email: &str, role: Role) -> User {
    let now = OffsetDateTime::now_utc();
    User {
        id,
        first_name: "Jean".to_string(),
        last_name: "Dupont".to_string(),
        email: email.to_string(),
        password_hash: "irrelevant".to_string(),
        role,
        enabled: true,
        account_non_locked: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[serial]
async fn test_validate_with_valid_token() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let user_id = common::seed_user(&pool, "jean@example.com", "password123", Role::Staff).await;
    let app = test_app(pool.clone());

    let token = common::create_test_codec()
        .issue(&stub_user(user_id, "jean@example.com", Role::Staff))
        .unwrap();

    let response = get(&app, "/api/v1/internal/validate", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
    assert_eq!(json["userId"], user_id);
    assert_eq!(json["email"], "jean@example.com");
    assert_eq!(json["role"], "STAFF");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_validate_without_header_is_200_invalid() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let app = test_app(pool.clone());

    let response = get(&app, "/api/v1/internal/validate", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], false);
    assert_eq!(json["message"], "Token manquant");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_validate_garbage_token() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let app = test_app(pool.clone());

    let response = get(&app, "/api/v1/internal/validate", Some("not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], false);
    assert_eq!(json["message"], "Token invalide ou expiré");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_validate_expired_token() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let user_id = common::seed_user(&pool, "jean@example.com", "password123", Role::Client).await;
    let app = test_app(pool.clone());

    // Same secret, negative lifetime: the token is expired at issuance
    let token = common::create_test_codec_with_ttl(-60)
        .issue(&stub_user(user_id, "jean@example.com", Role::Client))
        .unwrap();

    let response = get(&app, "/api/v1/internal/validate", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], false);
    assert_eq!(json["message"], "Token invalide ou expiré");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_validate_disabled_account_mid_session() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let user_id = common::seed_user(&pool, "jean@example.com", "password123", Role::Client).await;
    let app = test_app(pool.clone());

    // Token signed while the account was active
    let token = common::create_test_codec()
        .issue(&stub_user(user_id, "jean@example.com", Role::Client))
        .unwrap();

    // Account gets disabled afterwards
    common::set_account_flags(&pool, user_id, false, true).await;

    let response = get(&app, "/api/v1/internal/validate", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], false);
    assert_eq!(json["message"], "Compte désactivé");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_validate_deleted_user() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let app = test_app(pool.clone());

    // Well-signed token for an id that is not in the directory
    let token = common::create_test_codec()
        .issue(&stub_user(999_999, "ghost@example.com", Role::Client))
        .unwrap();

    let response = get(&app, "/api/v1/internal/validate", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], false);
    assert_eq!(json["message"], "Utilisateur non trouvé");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_get_user_by_id() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let user_id = common::seed_user(&pool, "jean@example.com", "password123", Role::Owner).await;
    let app = test_app(pool.clone());

    let response = get(&app, &format!("/api/v1/internal/users/{}", user_id), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], user_id);
    assert_eq!(json["email"], "jean@example.com");
    assert_eq!(json["role"], "OWNER");
    assert_eq!(json["fullName"], "Jean Dupont");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_get_user_not_found() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let app = test_app(pool.clone());

    let response = get(&app, "/api/v1/internal/users/424242", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["detail"], "Utilisateur non trouvé");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_get_user_by_email() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let user_id = common::seed_user(&pool, "jean@example.com", "password123", Role::Client).await;
    let app = test_app(pool.clone());

    let response = get(&app, "/api/v1/internal/users/email/jean@example.com", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], user_id);

    let missing = get(&app, "/api/v1/internal/users/email/nobody@example.com", None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_user_exists() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    let user_id = common::seed_user(&pool, "jean@example.com", "password123", Role::Client).await;
    let app = test_app(pool.clone());

    let response = get(
        &app,
        &format!("/api/v1/internal/users/{}/exists", user_id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Bool(true));

    let response = get(&app, "/api/v1/internal/users/424242/exists", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Bool(false));

    common::cleanup_test_db(&pool).await;
}
