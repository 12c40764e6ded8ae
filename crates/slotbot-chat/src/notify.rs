//! Slot notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use slotbot_core::config::NotifyConfig;
use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;
use slotbot_core::traits::Notifier;

/// Posts `{"content": text}` to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookNotifier {
    /// Create a notifier for `url`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, text: &str) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "content": text }))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Webhook request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external(format!("Webhook returned {status}")));
        }
        Ok(())
    }
}

/// Discards notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _text: &str) -> AppResult<()> {
        Ok(())
    }
}

/// A webhook notifier when `notify.webhook_url` is set, otherwise none.
pub fn notifier_from_config(config: &NotifyConfig) -> Option<Arc<dyn Notifier>> {
    config
        .webhook_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(|url| {
            Arc::new(WebhookNotifier::new(url, Duration::from_millis(config.timeout_ms)))
                as Arc<dyn Notifier>
        })
}
