//! Admission queue — a single-slot buffer between every input source and the
//! command processor.
//!
//! Producers wait a short, bounded time for the slot to free up and otherwise
//! drop their event. Bursts (key repeat, a slow command in flight) therefore
//! coalesce into at most one pending command instead of building a backlog.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

use crate::ports::EventSink;

/// Default time a producer waits for the slot.
pub const DEFAULT_OFFER_TIMEOUT: Duration = Duration::from_millis(50);

/// Create the producer and consumer halves of a queue.
#[must_use]
pub fn admission_queue(offer_timeout: Duration) -> (AdmissionQueue, AdmissionReceiver) {
    let (sender, receiver) = mpsc::channel(1);
    (
        AdmissionQueue {
            sender,
            offer_timeout,
        },
        AdmissionReceiver { receiver },
    )
}

/// Producer half; cheap to clone, one clone per source.
#[derive(Debug, Clone)]
pub struct AdmissionQueue {
    sender: mpsc::Sender<String>,
    offer_timeout: Duration,
}

impl AdmissionQueue {
    /// Try to place `event` in the slot, waiting at most the offer timeout.
    ///
    /// Returns `false` when the event was dropped.
    pub async fn offer(&self, event: String) -> bool {
        match self.sender.send_timeout(event, self.offer_timeout).await {
            Ok(()) => true,
            Err(SendTimeoutError::Timeout(event)) => {
                tracing::debug!(%event, "processor busy, dropping event");
                false
            }
            Err(SendTimeoutError::Closed(event)) => {
                tracing::debug!(%event, "processor gone, dropping event");
                false
            }
        }
    }
}

#[async_trait]
impl EventSink for AdmissionQueue {
    async fn emit(&self, identifier: String) {
        tracing::debug!(event = %identifier, "input event");
        self.offer(identifier).await;
    }
}

/// Consumer half, owned by the command processor.
#[derive(Debug)]
pub struct AdmissionReceiver {
    receiver: mpsc::Receiver<String>,
}

impl AdmissionReceiver {
    /// Wait for the next admitted event; `None` once every producer is gone.
    pub async fn take(&mut self) -> Option<String> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn should_admit_exactly_one_event_without_consumer() {
        let (queue, _receiver) = admission_queue(DEFAULT_OFFER_TIMEOUT);

        let mut admitted = 0;
        for n in 0..10 {
            if queue.offer(format!("event-{n}")).await {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_wait_up_to_timeout_before_dropping() {
        let (queue, _receiver) = admission_queue(Duration::from_millis(50));
        assert!(queue.offer("first".to_string()).await);

        let start = tokio::time::Instant::now();
        assert!(!queue.offer("second".to_string()).await);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn should_deliver_events_in_order_when_drained() {
        let (queue, mut receiver) = admission_queue(DEFAULT_OFFER_TIMEOUT);

        assert!(queue.offer("a".to_string()).await);
        assert_eq!(receiver.take().await.as_deref(), Some("a"));
        assert!(queue.offer("b".to_string()).await);
        assert_eq!(receiver.take().await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn should_drop_when_consumer_is_gone() {
        let (queue, receiver) = admission_queue(DEFAULT_OFFER_TIMEOUT);
        drop(receiver);
        assert!(!queue.offer("late".to_string()).await);
    }

    #[tokio::test]
    async fn should_end_take_when_all_producers_are_gone() {
        let (queue, mut receiver) = admission_queue(DEFAULT_OFFER_TIMEOUT);
        drop(queue);
        assert_eq!(receiver.take().await, None);
    }
}
