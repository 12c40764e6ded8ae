//! Outbound reply channels.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use slotbot_core::config::ChatConfig;
use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;
use slotbot_core::traits::OutboundChannel;

#[derive(Debug, Serialize)]
struct ChatMessageRequest<'a> {
    content: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Posts replies to the chat platform's message endpoint.
#[derive(Debug, Clone)]
pub struct HttpReplyChannel {
    client: Client,
    url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpReplyChannel {
    /// Create a channel posting to `url`.
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            token,
            timeout,
        }
    }
}

#[async_trait]
impl OutboundChannel for HttpReplyChannel {
    async fn send(&self, text: &str) -> AppResult<()> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&ChatMessageRequest {
                content: text,
                kind: "message",
            })
            .timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to post chat reply", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external(format!(
                "Chat reply rejected ({status}): {body}"
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Logs replies instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReplyChannel;

#[async_trait]
impl OutboundChannel for LogReplyChannel {
    async fn send(&self, text: &str) -> AppResult<()> {
        info!(reply = %text, "Reply (dry run)");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Select the outbound channel named by `config.outbound`.
pub fn outbound_from_config(
    config: &ChatConfig,
    send_timeout: Duration,
) -> AppResult<std::sync::Arc<dyn OutboundChannel>> {
    match config.outbound.as_str() {
        "http" => {
            let url = config.reply_url.clone().ok_or_else(|| {
                AppError::configuration("chat.reply_url is required when chat.outbound = \"http\"")
            })?;
            Ok(std::sync::Arc::new(HttpReplyChannel::new(
                url,
                config.reply_token.clone(),
                send_timeout,
            )))
        }
        "log" => Ok(std::sync::Arc::new(LogReplyChannel)),
        other => Err(AppError::configuration(format!(
            "Unknown outbound channel: '{other}'. Supported: http, log"
        ))),
    }
}
