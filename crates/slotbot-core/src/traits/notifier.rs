//! Best-effort external notification capability.

use async_trait::async_trait;

use crate::result::AppResult;

/// Fire-and-forget notification sink (e.g. a webhook).
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver `text`. Callers log failures and never retry.
    async fn notify(&self, text: &str) -> AppResult<()>;
}
