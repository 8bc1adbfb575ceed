use crate::domain::auth::{NewRefreshToken, RefreshTokenRepository, TokenCodec};
use crate::domain::users::{Role, User};
use crate::shared::error::AppError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// User fields echoed back alongside a token pair.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub enabled: bool,
    #[serde(with = "time::serde::iso8601::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            email: user.email.clone(),
            role: user.role,
            enabled: user.enabled,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

/// Response for login and refresh: a fresh token pair plus the user.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// SHA-256 hex digest of an opaque token value; only digests are stored.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issue an access token and mint a fresh opaque refresh token for the user.
/// The opaque value is a v4 UUID; collisions are ruled out by entropy, not
/// checked for.
pub async fn open_session(
    user: &User,
    token_codec: &Arc<dyn TokenCodec>,
    refresh_token_repo: &Arc<dyn RefreshTokenRepository>,
    refresh_token_ttl: i64,
) -> Result<AuthResponse, AppError> {
    let access_token = token_codec
        .issue(user)
        .map_err(AppError::InternalServerError)?;

    let refresh_token = Uuid::new_v4().to_string();
    let expires_at = OffsetDateTime::now_utc() + time::Duration::seconds(refresh_token_ttl);

    refresh_token_repo
        .create(NewRefreshToken {
            user_id: user.id,
            token_hash: hash_token(&refresh_token),
            expires_at,
        })
        .await
        .map_err(AppError::InternalServerError)?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: token_codec.access_token_ttl(),
        user: UserResponse::from(user),
    })
}
