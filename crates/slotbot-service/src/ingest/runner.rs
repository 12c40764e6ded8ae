//! Consumes normalized chat events and feeds the admission engine.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use slotbot_entity::chat::ChatEvent;
use slotbot_worker::ReplyQueue;

use crate::admission::AdmissionEngine;

/// Reserves a reply position for each command in arrival order, then runs
/// the command concurrently. Replies still leave in arrival order because
/// the reply runner drains reservations sequentially.
#[derive(Debug, Clone)]
pub struct ChatIngest {
    engine: Arc<AdmissionEngine>,
    replies: ReplyQueue,
}

impl ChatIngest {
    /// Creates a new ingest loop.
    pub fn new(engine: Arc<AdmissionEngine>, replies: ReplyQueue) -> Self {
        Self { engine, replies }
    }

    /// Run until cancelled or the feed closes its sender.
    pub async fn run(self, mut events: mpsc::Receiver<ChatEvent>, mut cancel: watch::Receiver<bool>) {
        info!("Chat ingest started");

        loop {
            tokio::select! {
                biased;
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Chat ingest received shutdown signal");
                        break;
                    }
                }
                next = events.recv() => {
                    match next {
                        Some(event) => {
                            self.dispatch(event).await;
                        }
                        None => {
                            info!("Chat feed closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("Chat ingest stopped");
    }

    /// Handle one event. Returns the command task, or `None` when the
    /// message is not a command or no reply position could be reserved.
    pub async fn dispatch(&self, event: ChatEvent) -> Option<JoinHandle<()>> {
        let command = self.engine.parse(&event)?;
        let label = format!("{}:{}", command.name(), event.user);

        let ticket = match self.replies.reserve(label.clone()).await {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!(command = %label, error = %e, "Could not reserve reply position, dropping command");
                return None;
            }
        };
        debug!(seq = ticket.seq(), command = %label, "Command accepted for processing");

        let engine = Arc::clone(&self.engine);
        Some(tokio::spawn(async move {
            match engine.execute(&event, &command).await {
                Ok(reply) => {
                    ticket.fulfil(reply);
                }
                Err(e) => {
                    error!(
                        command = %label,
                        error = %e,
                        storage = e.is_storage_failure(),
                        "Command failed, no reply will be sent"
                    );
                    ticket.abandon();
                }
            }
        }))
    }
}
