use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::env;
use std::time::Duration;

pub type DbPool = Pool<Postgres>;

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Build the Postgres pool. Auth traffic is short point queries (one user
/// lookup, one token row), so the pool stays small and acquire fails fast
/// rather than queueing logins behind a saturated pool.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let max_connections = env_u64("DB_MAX_CONNECTIONS", 10) as u32;
    let min_connections = env_u64("DB_MIN_CONNECTIONS", 2) as u32;

    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(min_connections)
        .acquire_timeout(Duration::from_secs(env_u64("DB_ACQUIRE_TIMEOUT_SECS", 3)))
        .idle_timeout(Duration::from_secs(env_u64("DB_IDLE_TIMEOUT_SECS", 300)))
        .connect(database_url)
        .await
}
