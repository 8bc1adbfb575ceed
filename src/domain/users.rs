use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use time::OffsetDateTime;

/// Closed set of roles known to the platform. Stored as TEXT, carried in
/// access-token claims and in the inter-service validation response.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
pub enum Role {
    Client,
    Staff,
    Owner,
    Admin,
}

impl Role {
    /// Authorization policy: admins may act wherever a specific role is
    /// required, everyone else only at their own level.
    pub fn authorizes(self, required: Role) -> bool {
        self == required || self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Client => "CLIENT",
            Role::Staff => "STAFF",
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub enabled: bool,
    pub account_non_locked: bool,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Read-side user directory. Profile CRUD lives elsewhere; the auth flows
/// only look users up and stamp their last login.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn exists_by_id(&self, id: i64) -> Result<bool>;
    async fn record_login(&self, id: i64, at: OffsetDateTime) -> Result<()>;
}
