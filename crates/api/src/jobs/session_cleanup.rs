//! Removes expired sessions and idle rate-limit buckets.

use persistence::repositories::SessionRepository;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::scheduler::Job;
use crate::middleware::RateLimiterState;

pub struct SessionCleanupJob {
    pool: PgPool,
    rate_limiter: Arc<RateLimiterState>,
}

impl SessionCleanupJob {
    pub fn new(pool: PgPool, rate_limiter: Arc<RateLimiterState>) -> Self {
        Self { pool, rate_limiter }
    }
}

#[async_trait::async_trait]
impl Job for SessionCleanupJob {
    fn name(&self) -> &'static str {
        "session_cleanup"
    }

    fn period(&self) -> Duration {
        Duration::from_secs(3600)
    }

    async fn run(&self) -> anyhow::Result<()> {
        let removed = SessionRepository::new(self.pool.clone())
            .delete_expired()
            .await?;
        self.rate_limiter.cleanup();

        if removed > 0 {
            tracing::info!(removed, "Deleted expired sessions");
        }
        Ok(())
    }
}
