//! Progress reporting for long-running submissions

use async_trait::async_trait;

/// Receives human-readable status lines while a plan is submitted
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Report a status line
    async fn on_message(&self, message: &str);
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}
}
