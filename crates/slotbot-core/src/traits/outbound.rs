//! Outbound chat reply capability.

use async_trait::async_trait;

use crate::result::AppResult;

/// Delivers a single reply message to the chat.
///
/// The channel is a single shared resource: callers other than the reply
/// runner must never invoke `send`, and the runner never overlaps calls.
#[async_trait]
pub trait OutboundChannel: Send + Sync + 'static {
    /// Send one message. Failures map to `ErrorKind::ExternalService`.
    async fn send(&self, text: &str) -> AppResult<()>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
