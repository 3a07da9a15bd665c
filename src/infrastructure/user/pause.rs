//! Injected suspension point between fetching and committing an update

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::user::UserId;

/// Hook awaited by the update path after the edit is applied in memory and
/// before it is committed. Holds no lock on the row.
#[async_trait]
pub trait UpdatePause: Send + Sync {
    async fn pause(&self, id: UserId);
}

/// Sleeps for a fixed duration, simulating a slow backend call
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

#[async_trait]
impl UpdatePause for FixedDelay {
    async fn pause(&self, id: UserId) {
        if self.0.is_zero() {
            return;
        }

        tracing::debug!(user_id = %id, delay_ms = self.0.as_millis() as u64, "Delaying update commit");
        tokio::time::sleep(self.0).await;
    }
}

/// Commits immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl UpdatePause for NoDelay {
    async fn pause(&self, _id: UserId) {}
}
