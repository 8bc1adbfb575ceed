use crate::infrastructure::db::DbPool;
use crate::infrastructure::jwt::JwtTokenCodec;
use std::sync::Arc;

/// Application state shared across handlers. The token codec wraps the
/// signing secret, built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub token_codec: Arc<JwtTokenCodec>,
    /// Refresh-token lifetime in seconds.
    pub refresh_token_ttl: i64,
}

impl AppState {
    pub fn new(pool: DbPool, token_codec: Arc<JwtTokenCodec>, refresh_token_ttl: i64) -> Self {
        Self {
            pool,
            token_codec,
            refresh_token_ttl,
        }
    }
}
