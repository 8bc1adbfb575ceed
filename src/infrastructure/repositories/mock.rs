//! In-memory repositories for use-case tests. The refresh-token mock keeps
//! the conditional-revoke contract of the Postgres implementation: the flag
//! flips under a single lock, so exactly one concurrent caller wins.

use crate::domain::auth::{NewRefreshToken, RefreshToken, RefreshTokenRepository};
use crate::domain::users::{Role, User, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;

pub fn user(id: i64, email: &str, role: Role) -> User {
    let now = OffsetDateTime::now_utc();
    User {
        id,
        first_name: "Jean".to_string(),
        last_name: "Dupont".to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        role,
        enabled: true,
        account_non_locked: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    lookups: Arc<AtomicUsize>,
    error: Arc<Mutex<Option<String>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().push(user);
        self
    }

    pub fn with_error(self, error: &str) -> Self {
        *self.error.lock().unwrap() = Some(error.to_string());
        self
    }

    pub fn set_enabled(&self, id: i64, enabled: bool) {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.enabled = enabled;
        }
    }

    pub fn set_locked(&self, id: i64, locked: bool) {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.account_non_locked = !locked;
        }
    }

    /// Number of directory reads performed, for asserting short-circuits.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check_error(&self) -> Result<()> {
        if let Some(msg) = self.error.lock().unwrap().as_ref() {
            return Err(anyhow::anyhow!(msg.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_error()?;
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_error()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        self.check_error()?;
        Ok(self.users.lock().unwrap().iter().any(|u| u.id == id))
    }

    async fn record_login(&self, id: i64, at: OffsetDateTime) -> Result<()> {
        self.check_error()?;
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.last_login = Some(at);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockRefreshTokenRepository {
    tokens: Arc<Mutex<Vec<RefreshToken>>>,
    next_id: Arc<AtomicI64>,
    error: Arc<Mutex<Option<String>>>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(self, error: &str) -> Self {
        *self.error.lock().unwrap() = Some(error.to_string());
        self
    }

    pub fn insert(&self, token: RefreshToken) {
        self.tokens.lock().unwrap().push(token);
    }

    pub fn all(&self) -> Vec<RefreshToken> {
        self.tokens.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<()> {
        if let Some(msg) = self.error.lock().unwrap().as_ref() {
            return Err(anyhow::anyhow!(msg.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        self.check_error()?;
        let row = RefreshToken {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            revoked: false,
            created_at: OffsetDateTime::now_utc(),
        };
        self.tokens.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        self.check_error()?;
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool> {
        self.check_error()?;
        let mut tokens = self.tokens.lock().unwrap();
        match tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && !t.revoked)
        {
            Some(t) => {
                t.revoked = true;
                t.expires_at = OffsetDateTime::now_utc();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64> {
        self.check_error()?;
        let mut tokens = self.tokens.lock().unwrap();
        let mut flipped = 0;
        for t in tokens.iter_mut().filter(|t| t.user_id == user_id && !t.revoked) {
            t.revoked = true;
            t.expires_at = OffsetDateTime::now_utc();
            flipped += 1;
        }
        Ok(flipped)
    }

    async fn delete_expired(&self) -> Result<u64> {
        self.check_error()?;
        let now = OffsetDateTime::now_utc();
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.expires_at > now);
        Ok((before - tokens.len()) as u64)
    }
}
