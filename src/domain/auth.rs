use crate::domain::users::{Role, User};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;

/// Claims carried by a signed access token. Self-contained: holders can be
/// identified without touching storage, which is why validation re-checks
/// the live account flags separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user email)
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: Role,
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Why a token failed structural verification. Storage is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("unsupported token")]
    Unsupported,
}

/// Signs and verifies access tokens against the process-wide secret.
/// Pure over its inputs; no I/O.
pub trait TokenCodec: Send + Sync {
    /// Issue a signed access token for the user, expiring after the
    /// configured TTL.
    fn issue(&self, user: &User) -> Result<String>;

    /// Check structure, signature and expiry of a presented token.
    fn verify(&self, token: &str) -> Result<AccessClaims, VerificationError>;

    /// Access-token lifetime in seconds, exposed to callers as `expiresIn`.
    fn access_token_ttl(&self) -> i64;
}

/// Refresh token row. Only the SHA-256 hash of the opaque value is stored;
/// `revoked` is terminal once set.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
    pub revoked: bool,
    pub created_at: OffsetDateTime,
}

impl RefreshToken {
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() >= self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        !self.revoked && !self.is_expired()
    }
}

#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: OffsetDateTime,
}

/// Persistence for refresh tokens and their validity state.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a freshly minted token with `revoked = false`.
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken>;

    /// Exact lookup by hash, with no validity filter: callers inspect the
    /// row to tell revoked from expired for diagnostics.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;

    /// Flag the token revoked and collapse its expiry to now. Conditional on
    /// `revoked = false`: returns whether this call flipped the flag, so at
    /// most one concurrent caller can claim a token for rotation.
    async fn revoke(&self, token_hash: &str) -> Result<bool>;

    /// Flag every not-yet-revoked token owned by the user. Returns how many
    /// rows were flipped.
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64>;

    /// Reclaim rows past their expiry. Driven by the periodic sweep only.
    async fn delete_expired(&self) -> Result<u64>;
}
