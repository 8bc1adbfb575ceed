use crate::application::auth::session::{AuthResponse, hash_token, open_session};
use crate::domain::auth::{RefreshTokenRepository, TokenCodec};
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Le refresh token est requis"))]
    pub refresh_token: String,
}

/// Exchanges a refresh token for a new token pair, rotating the presented
/// token out of existence. A rotated token can never be replayed: the claim
/// step below admits exactly one winner per token.
pub struct RefreshTokenUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_codec: Arc<dyn TokenCodec>,
    refresh_token_ttl: i64,
}

impl RefreshTokenUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        token_codec: Arc<dyn TokenCodec>,
        refresh_token_ttl: i64,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
            token_codec,
            refresh_token_ttl,
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, req: RefreshTokenRequest) -> Result<AuthResponse, AppError> {
        let token_hash = hash_token(&req.refresh_token);

        let stored = self
            .refresh_token_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| {
                tracing::warn!("refresh token not found");
                AppError::InvalidToken("Refresh token invalide".to_string())
            })?;

        // Revoked vs expired matters for the logs only; the caller sees one
        // uniform rejection either way.
        if stored.revoked {
            tracing::warn!(user_id = stored.user_id, "reuse of a revoked refresh token");
            return Err(AppError::InvalidToken(
                "Ce refresh token a été révoqué. Veuillez vous reconnecter.".to_string(),
            ));
        }
        if stored.is_expired() {
            tracing::warn!(user_id = stored.user_id, "refresh token expired");
            return Err(AppError::InvalidToken(
                "Refresh token expiré. Veuillez vous reconnecter.".to_string(),
            ));
        }

        let user = self
            .user_repo
            .find_by_id(stored.user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::InvalidToken("Refresh token invalide".to_string()))?;

        // A token whose owner has been disabled or locked is burned on sight.
        if !user.enabled {
            tracing::warn!(user_id = user.id, "refresh attempt on a disabled account");
            self.refresh_token_repo
                .revoke(&token_hash)
                .await
                .map_err(AppError::InternalServerError)?;
            return Err(AppError::AccountDisabled);
        }
        if !user.account_non_locked {
            tracing::warn!(user_id = user.id, "refresh attempt on a locked account");
            self.refresh_token_repo
                .revoke(&token_hash)
                .await
                .map_err(AppError::InternalServerError)?;
            return Err(AppError::AccountLocked);
        }

        // Claim the token. The store flips `revoked` only if it is still
        // false, so a concurrent rotation of the same token loses here.
        let claimed = self
            .refresh_token_repo
            .revoke(&token_hash)
            .await
            .map_err(AppError::InternalServerError)?;

        if !claimed {
            tracing::warn!(user_id = user.id, "lost rotation race for refresh token");
            return Err(AppError::InvalidToken(
                "Ce refresh token a été révoqué. Veuillez vous reconnecter.".to_string(),
            ));
        }

        tracing::info!(user_id = user.id, "refresh token rotated");

        open_session(
            &user,
            &self.token_codec,
            &self.refresh_token_repo,
            self.refresh_token_ttl,
        )
        .await
    }
}
