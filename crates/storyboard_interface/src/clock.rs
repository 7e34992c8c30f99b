//! Injectable wait primitive.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the current task for a duration.
///
/// The video poller waits through this trait so tests can count waits
/// without real elapsed time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
