use crate::infrastructure::state::AppState;
use crate::presentation::handlers::internal;
use axum::{Router, routing::get};

/// Internal routes - consumed by sibling services, not end users
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/validate", get(internal::validate_token))
        .route("/users/{id}", get(internal::get_user))
        .route("/users/email/{email}", get(internal::get_user_by_email))
        .route("/users/{id}/exists", get(internal::user_exists))
}
