//! Chat feed and outbound reply configuration.

use serde::{Deserialize, Serialize};

/// Chat platform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Websocket URL of the real-time chat feed.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// Channel name subscribed on the feed (e.g. `chatrooms.1234.v2`).
    #[serde(default)]
    pub channel: String,
    /// Whether to connect to the feed at all.
    #[serde(default = "default_true")]
    pub feed_enabled: bool,
    /// Outbound channel implementation: `"http"` or `"log"`.
    #[serde(default = "default_outbound")]
    pub outbound: String,
    /// Endpoint that accepts chat replies.
    #[serde(default)]
    pub reply_url: Option<String>,
    /// Bearer token used for replies.
    #[serde(default)]
    pub reply_token: Option<String>,
    /// Offset of the reference time zone from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Prefix that marks a message as a command.
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Capacity of the inbound event channel.
    #[serde(default = "default_inbound_buffer")]
    pub inbound_buffer_size: usize,
    /// Initial reconnect delay in milliseconds.
    #[serde(default = "default_backoff_initial")]
    pub reconnect_initial_ms: u64,
    /// Reconnect delay cap in milliseconds.
    #[serde(default = "default_backoff_max")]
    pub reconnect_max_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            channel: String::new(),
            feed_enabled: true,
            outbound: default_outbound(),
            reply_url: None,
            reply_token: None,
            utc_offset_minutes: 0,
            command_prefix: default_prefix(),
            inbound_buffer_size: default_inbound_buffer(),
            reconnect_initial_ms: default_backoff_initial(),
            reconnect_max_ms: default_backoff_max(),
        }
    }
}

fn default_feed_url() -> String {
    "wss://ws-us2.pusher.com/app/32cbd69e4b950bf97679?protocol=7&client=js&version=8.4.0&flash=false"
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_outbound() -> String {
    "log".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_inbound_buffer() -> usize {
    1024
}

fn default_backoff_initial() -> u64 {
    1000
}

fn default_backoff_max() -> u64 {
    60_000
}
