//! Reply queue and ticket reservation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot};

use slotbot_core::error::AppError;
use slotbot_core::result::AppResult;

/// One reserved position in the queue, as seen by the runner.
#[derive(Debug)]
pub struct QueuedReply {
    /// Reservation order.
    pub seq: u64,
    /// What the reply belongs to, for logs.
    pub label: String,
    /// Resolves with the reply text, or errors if the ticket was dropped.
    pub decision: oneshot::Receiver<String>,
}

/// A reserved position in the reply queue.
///
/// Fulfil it with the reply text, or drop it to send nothing. Either way the
/// runner moves on to the next reservation.
#[derive(Debug)]
pub struct ReplyTicket {
    seq: u64,
    sender: oneshot::Sender<String>,
}

impl ReplyTicket {
    /// Reservation order.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Provide the reply text. Returns `false` if the runner already gave up
    /// on this ticket.
    pub fn fulfil(self, text: impl Into<String>) -> bool {
        self.sender.send(text.into()).is_ok()
    }

    /// Give up the reservation without a reply.
    pub fn abandon(self) {}
}

/// Producer side of the reply queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReplyQueue {
    sender: mpsc::Sender<QueuedReply>,
    next_seq: Arc<AtomicU64>,
}

impl ReplyQueue {
    /// Create a queue holding up to `capacity` outstanding reservations.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<QueuedReply>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let queue = Self {
            sender,
            next_seq: Arc::new(AtomicU64::new(0)),
        };
        (queue, receiver)
    }

    /// Reserve the next position. Waits while the queue is full.
    ///
    /// Callers that need arrival order must reserve sequentially.
    pub async fn reserve(&self, label: impl Into<String>) -> AppResult<ReplyTicket> {
        let (tx, rx) = oneshot::channel();
        let permit = self
            .sender
            .reserve()
            .await
            .map_err(|_| AppError::service_unavailable("Reply queue is closed"))?;
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        permit.send(QueuedReply {
            seq,
            label: label.into(),
            decision: rx,
        });
        Ok(ReplyTicket { seq, sender: tx })
    }

    /// Queue text that is already known.
    pub async fn enqueue(&self, label: impl Into<String>, text: impl Into<String>) -> AppResult<u64> {
        let ticket = self.reserve(label).await?;
        let seq = ticket.seq();
        ticket.fulfil(text);
        Ok(seq)
    }

    /// Whether the runner side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reservations_are_sequential() {
        let (queue, mut rx) = ReplyQueue::new(4);
        let first = queue.reserve("a").await.unwrap();
        let second = queue.reserve("b").await.unwrap();
        assert_eq!(first.seq(), 0);
        assert_eq!(second.seq(), 1);

        second.fulfil("two");
        first.fulfil("one");

        let a = rx.recv().await.unwrap();
        let b = rx.recv().await.unwrap();
        assert_eq!(a.label, "a");
        assert_eq!(a.decision.await.unwrap(), "one");
        assert_eq!(b.decision.await.unwrap(), "two");
    }

    #[tokio::test]
    async fn test_abandoned_ticket_resolves_as_error() {
        let (queue, mut rx) = ReplyQueue::new(4);
        queue.reserve("dropped").await.unwrap().abandon();
        let entry = rx.recv().await.unwrap();
        assert!(entry.decision.await.is_err());
    }

    #[tokio::test]
    async fn test_reserve_fails_when_runner_gone() {
        let (queue, rx) = ReplyQueue::new(1);
        drop(rx);
        assert!(queue.is_closed());
        assert!(queue.reserve("x").await.is_err());
    }
}
