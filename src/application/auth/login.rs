use crate::application::auth::session::{AuthResponse, open_session};
use crate::domain::auth::{RefreshTokenRepository, TokenCodec};
use crate::domain::password::PasswordHasher;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,

    #[validate(length(min = 1, message = "Le mot de passe est requis"))]
    pub password: String,
}

pub struct LoginUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_codec: Arc<dyn TokenCodec>,
    password_hasher: Arc<dyn PasswordHasher>,
    refresh_token_ttl: i64,
}

impl LoginUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        token_codec: Arc<dyn TokenCodec>,
        password_hasher: Arc<dyn PasswordHasher>,
        refresh_token_ttl: i64,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
            token_codec,
            password_hasher,
            refresh_token_ttl,
        }
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn execute(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = req.email.trim().to_lowercase();

        // Unknown email and wrong password are indistinguishable to the caller.
        let user = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or(AppError::InvalidCredentials)?;

        let password_ok = self
            .password_hasher
            .verify_password(&req.password, &user.password_hash)
            .map_err(AppError::InternalServerError)?;

        if !password_ok {
            tracing::warn!("authentication failed");
            return Err(AppError::InvalidCredentials);
        }

        // Account state is only revealed once the credentials check out.
        if !user.account_non_locked {
            tracing::warn!("login attempt on a locked account");
            return Err(AppError::AccountLocked);
        }
        if !user.enabled {
            tracing::warn!("login attempt on a disabled account");
            return Err(AppError::AccountDisabled);
        }

        self.user_repo
            .record_login(user.id, OffsetDateTime::now_utc())
            .await
            .map_err(AppError::InternalServerError)?;

        tracing::info!(user_id = user.id, "login successful");

        open_session(
            &user,
            &self.token_codec,
            &self.refresh_token_repo,
            self.refresh_token_ttl,
        )
        .await
    }
}
