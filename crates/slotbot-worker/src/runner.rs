//! Reply runner: the only caller of the outbound channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};

use slotbot_core::config::ReplyConfig;
use slotbot_core::traits::OutboundChannel;

use crate::queue::QueuedReply;

/// What happened to one queued reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The channel accepted the text.
    Sent,
    /// The ticket was dropped; nothing to send.
    Abandoned,
    /// No decision arrived in time.
    DecisionTimedOut,
    /// The channel reported an error.
    Failed(String),
    /// The channel did not answer in time.
    SendTimedOut,
}

/// Running totals, shared with whoever wants to report them.
#[derive(Debug, Default)]
pub struct ReplyStats {
    sent: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

/// Serializable copy of [`ReplyStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyStatsSnapshot {
    /// Replies delivered.
    pub sent: u64,
    /// Reservations that produced no reply.
    pub skipped: u64,
    /// Sends that failed or timed out.
    pub failed: u64,
}

impl ReplyStats {
    fn record(&self, outcome: &DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::Sent => &self.sent,
            DeliveryOutcome::Abandoned | DeliveryOutcome::DecisionTimedOut => &self.skipped,
            DeliveryOutcome::Failed(_) | DeliveryOutcome::SendTimedOut => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current totals.
    pub fn snapshot(&self) -> ReplyStatsSnapshot {
        ReplyStatsSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Drains the reply queue in reservation order, one send at a time.
pub struct ReplyRunner {
    channel: Arc<dyn OutboundChannel>,
    decision_timeout: Duration,
    send_timeout: Duration,
    min_interval: Duration,
    stats: Arc<ReplyStats>,
    last_send: Option<Instant>,
}

impl std::fmt::Debug for ReplyRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyRunner")
            .field("channel", &self.channel.name())
            .field("decision_timeout", &self.decision_timeout)
            .field("send_timeout", &self.send_timeout)
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

impl ReplyRunner {
    /// Create a runner bound to `channel`.
    pub fn new(channel: Arc<dyn OutboundChannel>, config: &ReplyConfig) -> Self {
        Self {
            channel,
            decision_timeout: Duration::from_millis(config.decision_timeout_ms),
            send_timeout: Duration::from_millis(config.send_timeout_ms),
            min_interval: Duration::from_millis(config.min_interval_ms),
            stats: Arc::new(ReplyStats::default()),
            last_send: None,
        }
    }

    /// Shared handle to the runner's counters.
    pub fn stats(&self) -> Arc<ReplyStats> {
        Arc::clone(&self.stats)
    }

    /// Run until the cancel signal is received or every producer is gone.
    pub async fn run(
        mut self,
        mut queue: mpsc::Receiver<QueuedReply>,
        mut cancel: watch::Receiver<bool>,
    ) {
        tracing::info!(
            channel = self.channel.name(),
            decision_timeout_ms = self.decision_timeout.as_millis() as u64,
            send_timeout_ms = self.send_timeout.as_millis() as u64,
            min_interval_ms = self.min_interval.as_millis() as u64,
            "Reply runner started"
        );

        loop {
            tokio::select! {
                biased;
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Reply runner received shutdown signal");
                        break;
                    }
                }
                next = queue.recv() => {
                    match next {
                        Some(reply) => {
                            self.process(reply).await;
                        }
                        None => {
                            tracing::info!("Reply queue closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!(stats = ?self.stats.snapshot(), "Reply runner stopped");
    }

    /// Resolve and deliver one queued reply.
    pub async fn process(&mut self, reply: QueuedReply) -> DeliveryOutcome {
        let QueuedReply {
            seq,
            label,
            decision,
        } = reply;

        let outcome = match time::timeout(self.decision_timeout, decision).await {
            Ok(Ok(text)) => self.deliver(seq, &label, &text).await,
            Ok(Err(_)) => {
                tracing::debug!(seq, label = %label, "No reply for reservation");
                DeliveryOutcome::Abandoned
            }
            Err(_) => {
                tracing::warn!(seq, label = %label, "Timed out waiting for reply decision, skipping");
                DeliveryOutcome::DecisionTimedOut
            }
        };
        self.stats.record(&outcome);
        outcome
    }

    async fn deliver(&mut self, seq: u64, label: &str, text: &str) -> DeliveryOutcome {
        if let Some(last) = self.last_send {
            let ready_at = last + self.min_interval;
            if ready_at > Instant::now() {
                time::sleep_until(ready_at).await;
            }
        }
        self.last_send = Some(Instant::now());

        match time::timeout(self.send_timeout, self.channel.send(text)).await {
            Ok(Ok(())) => {
                tracing::info!(seq, label = %label, reply = %text, "Reply sent");
                DeliveryOutcome::Sent
            }
            Ok(Err(e)) => {
                tracing::error!(seq, label = %label, error = %e, "Reply delivery failed");
                DeliveryOutcome::Failed(e.message)
            }
            Err(_) => {
                tracing::error!(seq, label = %label, "Reply delivery timed out");
                DeliveryOutcome::SendTimedOut
            }
        }
    }
}
