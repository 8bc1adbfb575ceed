use crate::domain::auth::RefreshTokenRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Spawn the recurring expired-token sweep. A single task owns the schedule,
/// so runs never overlap; request traffic is unaffected since only rows
/// already past expiry are touched.
pub fn spawn_expired_token_sweep(
    repo: Arc<dyn RefreshTokenRepository>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match repo.delete_expired().await {
                Ok(deleted) if deleted > 0 => {
                    tracing::info!(deleted, "expired refresh tokens deleted");
                }
                Ok(_) => {
                    tracing::debug!("no expired refresh tokens to delete");
                }
                Err(e) => {
                    tracing::error!("expired token sweep failed: {:?}", e);
                }
            }
        }
    })
}
