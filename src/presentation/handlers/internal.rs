use crate::application::auth::session::UserResponse;
use crate::application::auth::validate::{TokenValidation, ValidateTokenUseCase};
use crate::domain::users::UserRepository;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
};
use std::sync::Arc;

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Inter-service token validation. Always answers 200 with the structured
/// valid/invalid form; a missing or malformed header short-circuits without
/// touching storage.
#[utoipa::path(
    get,
    path = "/api/v1/internal/validate",
    responses(
        (status = 200, description = "Résultat de validation", body = TokenValidation)
    ),
    security(("bearer_auth" = [])),
    tag = "internal"
)]
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(token) = extract_bearer(&headers) else {
        tracing::warn!("validation request without a bearer token");
        return Json(TokenValidation::invalid("Token manquant"));
    };

    let use_case = ValidateTokenUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool)),
        state.token_codec,
    );

    let validation = use_case.execute(token).await;

    if validation.valid {
        tracing::debug!(user_id = ?validation.user_id, "token validated");
    } else {
        tracing::warn!(message = ?validation.message, "token validation refused");
    }

    Json(validation)
}

/// Internal user lookup by id.
#[utoipa::path(
    get,
    path = "/api/v1/internal/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Utilisateur", body = UserResponse),
        (status = 404, description = "Utilisateur non trouvé")
    ),
    tag = "internal"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = PostgresUserRepository::new(state.pool);

    let user = repo
        .find_by_id(id)
        .await
        .map_err(AppError::InternalServerError)?
        .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Internal user lookup by email.
#[utoipa::path(
    get,
    path = "/api/v1/internal/users/email/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Utilisateur", body = UserResponse),
        (status = 404, description = "Utilisateur non trouvé")
    ),
    tag = "internal"
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let repo = PostgresUserRepository::new(state.pool);

    let user = repo
        .find_by_email(&email)
        .await
        .map_err(AppError::InternalServerError)?
        .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Internal existence check.
#[utoipa::path(
    get,
    path = "/api/v1/internal/users/{id}/exists",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "Existence", body = bool)),
    tag = "internal"
)]
pub async fn user_exists(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = PostgresUserRepository::new(state.pool);

    let exists = repo
        .exists_by_id(id)
        .await
        .map_err(AppError::InternalServerError)?;

    Ok(Json(exists))
}
