//! Durable-queue transport for the notification pipeline, backed by
//! NATS. Generalizes `NatsClient` from the order-confirmation event bus
//! this stack originally carried into a typed queue for
//! `NotificationQueueItem`.

use async_nats::{Client, ConnectOptions, Subscriber};
use futures_util::StreamExt;
use shared_error::AppError;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::queue::NotificationQueueItem;

#[derive(Clone)]
pub struct NatsQueue {
    client: Client,
}

impl NatsQueue {
    pub async fn connect(nats_url: &str) -> Result<Self, AppError> {
        info!("connecting to NATS at {}", nats_url);

        let client = ConnectOptions::new()
            .retry_on_initial_connect()
            .reconnect_delay_callback(|attempt| {
                let delay = Duration::from_millis(2u64.pow(attempt.min(6) as u32) * 100);
                warn!("reconnecting to NATS in {:?}", delay);
                delay
            })
            .connect(nats_url)
            .await
            .map_err(|e| AppError::Internal(format!("NATS connection failed: {e}")))?;

        info!("connected to NATS");
        Ok(Self { client })
    }

    /// Enqueue one fan-out item. Best-effort: the caller (C8) logs a
    /// warning on failure and continues — the persisted `Notification`
    /// row is the source of truth, not the queue.
    pub async fn enqueue(&self, subject: &str, item: &NotificationQueueItem) -> Result<(), AppError> {
        let payload = serde_json::to_vec(item)
            .map_err(|e| AppError::Internal(format!("failed to serialize queue item: {e}")))?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| AppError::Internal(format!("NATS publish failed: {e}")))?;

        Ok(())
    }

    pub async fn subscribe(&self, subject: &str) -> Result<Subscriber, AppError> {
        self.client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| AppError::Internal(format!("NATS subscribe failed: {e}")))
    }
}

/// Pull the next queue item off a subscription, skipping (and logging)
/// any message that fails to deserialize rather than wedging the
/// worker's dequeue loop.
pub async fn next_item(subscriber: &mut Subscriber) -> Option<NotificationQueueItem> {
    loop {
        let message = subscriber.next().await?;
        match serde_json::from_slice::<NotificationQueueItem>(&message.payload) {
            Ok(item) => return Some(item),
            Err(e) => {
                error!("dropping malformed queue message: {}", e);
                continue;
            },
        }
    }
}
