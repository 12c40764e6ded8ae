//! Websocket client for the inbound chat feed.

use std::time::Duration;

use chrono::Utc;
use futures::{Sink, SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use slotbot_core::config::ChatConfig;
use slotbot_core::error::{AppError, ErrorKind};
use slotbot_core::result::AppResult;
use slotbot_entity::chat::ChatEvent;

use crate::frame::{Envelope, parse_frame, protocol};

/// Capped exponential reconnect delay.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    /// Start at `initial`, doubling up to `max`.
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.min(max);
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// The delay to wait now; the following one doubles.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    /// Back to the initial delay.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// How a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// Shutdown was requested.
    Cancelled,
    /// The ingest side dropped its receiver.
    ConsumerGone,
    /// The server closed the socket.
    Closed {
        /// Whether the channel subscription had been confirmed.
        subscribed: bool,
    },
}

/// Build the protocol answer for a control event, if one is needed.
pub fn control_reply(event: &str, channel: &str) -> Option<String> {
    match event {
        protocol::PING => Some(json!({"event": protocol::PONG, "data": {}}).to_string()),
        protocol::CONNECTION_ESTABLISHED => Some(
            json!({
                "event": protocol::SUBSCRIBE,
                "data": {"auth": "", "channel": channel}
            })
            .to_string(),
        ),
        _ => None,
    }
}

/// Connects to the feed, subscribes to one channel and forwards chat
/// messages into an mpsc channel. Reconnects until cancelled.
#[derive(Debug)]
pub struct PusherFeed {
    url: String,
    channel: String,
    events: mpsc::Sender<ChatEvent>,
    backoff: Backoff,
}

impl PusherFeed {
    /// Create a feed client from configuration.
    pub fn new(config: &ChatConfig, events: mpsc::Sender<ChatEvent>) -> Self {
        Self {
            url: config.feed_url.clone(),
            channel: config.channel.clone(),
            events,
            backoff: Backoff::new(
                Duration::from_millis(config.reconnect_initial_ms),
                Duration::from_millis(config.reconnect_max_ms),
            ),
        }
    }

    /// Run until the cancel signal fires or the consumer goes away.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        info!(url = %self.url, channel = %self.channel, "Chat feed starting");

        loop {
            if *cancel.borrow() {
                break;
            }

            match self.connect_once(&mut cancel).await {
                Ok(SessionEnd::Cancelled) => break,
                Ok(SessionEnd::ConsumerGone) => {
                    info!("Chat ingest closed, stopping feed");
                    break;
                }
                Ok(SessionEnd::Closed { subscribed }) => {
                    warn!(subscribed, "Chat feed connection closed");
                    if subscribed {
                        self.backoff.reset();
                    }
                }
                Err(e) => {
                    error!(error = %e, "Chat feed connection failed");
                }
            }

            let delay = self.backoff.next_delay();
            info!(delay_ms = delay.as_millis() as u64, "Reconnecting to chat feed");
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Chat feed stopped");
    }

    async fn connect_once(&self, cancel: &mut watch::Receiver<bool>) -> AppResult<SessionEnd> {
        let (socket, _) = connect_async(self.url.as_str()).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to connect to chat feed", e)
        })?;
        info!(url = %self.url, "Chat feed connected");

        let (mut sink, mut stream) = socket.split();
        let mut subscribed = false;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        let _ = sink.send(Message::Close(None)).await;
                        return Ok(SessionEnd::Cancelled);
                    }
                }
                next = stream.next() => {
                    let text = match next {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "Chat feed sent close frame");
                            return Ok(SessionEnd::Closed { subscribed });
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            return Err(AppError::with_source(
                                ErrorKind::ExternalService,
                                "Chat feed read failed",
                                e,
                            ));
                        }
                        None => return Ok(SessionEnd::Closed { subscribed }),
                    };

                    let Some(envelope) = Envelope::decode(text.as_str()) else {
                        debug!("Ignoring non-JSON frame");
                        continue;
                    };
                    let event = envelope.event.as_deref().unwrap_or_default();

                    if let Some(reply) = control_reply(event, &self.channel) {
                        debug!(event, "Answering control event");
                        send_text(&mut sink, reply).await?;
                        continue;
                    }
                    match event {
                        protocol::SUBSCRIPTION_SUCCEEDED => {
                            subscribed = true;
                            info!(channel = %self.channel, "Subscribed to chat channel");
                            continue;
                        }
                        protocol::ERROR => {
                            warn!(data = ?envelope.data, "Chat feed reported an error");
                            continue;
                        }
                        _ => {}
                    }

                    if let Some(chat) = parse_frame(text.as_str(), Utc::now()) {
                        debug!(user = %chat.user, content = %chat.content, "Chat message received");
                        if self.events.send(chat).await.is_err() {
                            return Ok(SessionEnd::ConsumerGone);
                        }
                    }
                }
            }
        }
    }
}

async fn send_text<S>(sink: &mut S, text: String) -> AppResult<()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    sink.send(Message::Text(text.into())).await.map_err(|e| {
        AppError::with_source(ErrorKind::ExternalService, "Chat feed write failed", e)
    })
}
