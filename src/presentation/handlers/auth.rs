use crate::application::auth::login::{LoginRequest, LoginUseCase};
use crate::application::auth::logout::{LogoutAllUseCase, LogoutUseCase};
use crate::application::auth::refresh::{RefreshTokenRequest, RefreshTokenUseCase};
use crate::application::auth::session::AuthResponse;
use crate::infrastructure::password::PasswordService;
use crate::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use std::sync::Arc;

/// Login handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Connexion réussie", body = AuthResponse),
        (status = 401, description = "Identifiants invalides ou compte inactif", body = ErrorResponse),
        (status = 422, description = "Erreur de validation", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LoginUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool)),
        state.token_codec,
        Arc::new(PasswordService::new()),
        state.refresh_token_ttl,
    );

    let response = use_case.execute(req).await?;

    Ok(Json(response))
}

/// Refresh-token rotation handler. The returned refresh token replaces the
/// presented one, which is unusable from this point on.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token rafraîchi avec succès", body = AuthResponse),
        (status = 401, description = "Refresh token invalide", body = ErrorResponse),
        (status = 422, description = "Erreur de validation", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = RefreshTokenUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool)),
        state.token_codec,
        state.refresh_token_ttl,
    );

    let response = use_case.execute(req).await?;

    Ok(Json(response))
}

/// Logout handler
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Déconnexion réussie"),
        (status = 401, description = "Refresh token inconnu", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LogoutUseCase::new(Arc::new(PostgresRefreshTokenRepository::new(state.pool)));

    use_case.execute(&req.refresh_token).await?;

    Ok(Json(json!({ "message": "Déconnexion réussie" })))
}

/// Logout-all handler: revokes every session of the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout-all",
    responses(
        (status = 200, description = "Toutes les sessions ont été déconnectées"),
        (status = 401, description = "Access token invalide", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout_all(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LogoutAllUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool)),
    );

    use_case.execute(auth_user.claims.user_id).await?;

    Ok(Json(
        json!({ "message": "Toutes les sessions ont été déconnectées" }),
    ))
}
