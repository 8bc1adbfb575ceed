use crate::infrastructure::state::AppState;
use crate::presentation::handlers::admin;
use axum::{Router, routing::post};

/// Admin routes - forced session management
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/{id}/logout-all", post(admin::force_logout_all))
}
