use crate::application::auth::session::hash_token;
use crate::domain::auth::RefreshTokenRepository;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use std::sync::Arc;

/// Revokes a single session. Any token on record is accepted: re-revoking
/// and revoking an expired token are both no-op successes. Only a token that
/// was never issued is refused.
pub struct LogoutUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
}

impl LogoutUseCase {
    pub fn new(refresh_token_repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self { refresh_token_repo }
    }

    #[tracing::instrument(skip_all)]
    pub async fn execute(&self, refresh_token: &str) -> Result<(), AppError> {
        if refresh_token.trim().is_empty() {
            return Err(AppError::InvalidToken(
                "Refresh token requis pour la déconnexion".to_string(),
            ));
        }

        let token_hash = hash_token(refresh_token);

        let stored = self
            .refresh_token_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| {
                tracing::warn!("logout with an unknown refresh token");
                AppError::InvalidToken("Refresh token invalide".to_string())
            })?;

        if stored.revoked {
            tracing::debug!(user_id = stored.user_id, "token already revoked, nothing to do");
            return Ok(());
        }

        self.refresh_token_repo
            .revoke(&token_hash)
            .await
            .map_err(AppError::InternalServerError)?;

        tracing::info!(user_id = stored.user_id, "refresh token revoked");
        Ok(())
    }
}

/// Revokes every session a user owns, valid or not. Used on explicit
/// logout-all and whenever an account changes in a way that must end its
/// sessions (password change, role change, disablement, deletion).
pub struct LogoutAllUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
}

impl LogoutAllUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: i64) -> Result<(), AppError> {
        let exists = self
            .user_repo
            .exists_by_id(user_id)
            .await
            .map_err(AppError::InternalServerError)?;

        if !exists {
            return Err(AppError::NotFound("Utilisateur non trouvé".to_string()));
        }

        let revoked = self
            .refresh_token_repo
            .revoke_all_for_user(user_id)
            .await
            .map_err(AppError::InternalServerError)?;

        tracing::info!(user_id, revoked, "all sessions revoked");
        Ok(())
    }
}
