use crate::application::auth::logout::LogoutAllUseCase;
use crate::domain::users::Role;
use crate::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;

/// Administrative forced revocation of another user's sessions, used when an
/// account is disabled, deleted or changes role.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/logout-all",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Toutes les sessions ont été révoquées"),
        (status = 403, description = "Réservé aux administrateurs", body = ErrorResponse),
        (status = 404, description = "Utilisateur non trouvé", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn force_logout_all(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require(Role::Admin)?;

    let use_case = LogoutAllUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool)),
    );

    use_case.execute(id).await?;

    tracing::info!(
        admin_id = auth_user.claims.user_id,
        user_id = id,
        "sessions revoked by administrator"
    );

    Ok(Json(
        json!({ "message": "Toutes les sessions ont été révoquées" }),
    ))
}
