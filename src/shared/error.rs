use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Business error kinds. Transport mapping happens only here, in the
/// `IntoResponse` impl; use cases stay free of status codes.
///
/// User-facing messages are French: they are part of the wire protocol the
/// platform's clients already consume.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erreur de validation des données: {0}")]
    ValidationError(String),
    /// Unknown email and wrong password collapse into this one message so
    /// callers cannot enumerate accounts.
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,
    #[error("Compte désactivé")]
    AccountDisabled,
    #[error("Compte verrouillé")]
    AccountLocked,
    /// Covers not-found, revoked, expired and malformed tokens alike; the
    /// distinction is logged, never surfaced at the authorization boundary.
    #[error("{0}")]
    InvalidToken(String),
    #[error("Accès refusé")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    pub status: u16,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::AccountDisabled => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::AccountLocked => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erreur interne du serveur".to_string(),
                )
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erreur interne du serveur".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            errors: vec![ErrorDetail {
                status: status.as_u16(),
                detail: message,
            }],
        };

        (status, Json(body)).into_response()
    }
}
