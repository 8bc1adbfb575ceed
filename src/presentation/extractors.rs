use crate::domain::auth::{AccessClaims, TokenCodec};
use crate::domain::users::{Role, UserRepository};
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated caller. Verifies the bearer token with the injected codec,
/// then re-reads the account flags: a token whose owner has been disabled or
/// locked mid-session is refused here, before any handler runs.
pub struct AuthUser {
    pub claims: AccessClaims,
}

impl AuthUser {
    pub fn require(&self, required: Role) -> Result<(), AppError> {
        if self.claims.role.authorizes(required) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::InvalidToken("Token manquant".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::InvalidToken("Token manquant".to_string()))?;

        let claims = state
            .token_codec
            .verify(token)
            .map_err(|_| AppError::InvalidToken("Token invalide ou expiré".to_string()))?;

        let repo = PostgresUserRepository::new(state.pool.clone());
        let user = repo
            .find_by_id(claims.user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::InvalidToken("Token invalide ou expiré".to_string()))?;

        if !user.enabled {
            tracing::warn!(user_id = user.id, "bearer token for a disabled account");
            return Err(AppError::AccountDisabled);
        }
        if !user.account_non_locked {
            tracing::warn!(user_id = user.id, "bearer token for a locked account");
            return Err(AppError::AccountLocked);
        }

        Ok(AuthUser { claims })
    }
}
