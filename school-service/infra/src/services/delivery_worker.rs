//! Delivery worker (C9): dequeues `NotificationQueueItem`s, resolves
//! push registrations, calls the push gateway, and retries on failure
//! with exponential backoff. Grounded on
//! `services/inventory_service/api/src/worker.rs`'s poll-and-retry
//! shape, generalized from "publish to NATS" to "call a push gateway
//! and interpret token-health feedback".

use school_service_core::repositories::PushRegistrationRepository;
use shared_error::AppError;
use shared_events::{nats, NatsQueue, NotificationQueueItem, PushGateway};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct DeliveryWorkerConfig {
    pub subject: String,
    pub initial_delay_ms: u64,
    pub factor: u32,
    pub cap_ms: u64,
    pub max_retries: u32,
}

impl Default for DeliveryWorkerConfig {
    fn default() -> Self {
        Self {
            subject: "notifications.delivery".to_string(),
            initial_delay_ms: 1_000,
            factor: 2,
            cap_ms: 300_000,
            max_retries: 5,
        }
    }
}

/// `delay(n) = min(initial * factor^(n-1), cap)` (spec §4.9), `n`
/// being the 1-indexed retry attempt.
pub fn backoff_delay(config: &DeliveryWorkerConfig, attempt: u32) -> Duration {
    let factor = config.factor.pow(attempt.saturating_sub(1));
    let millis = config.initial_delay_ms.saturating_mul(factor as u64);
    Duration::from_millis(millis.min(config.cap_ms))
}

/// Runs until `cancel` fires. New dequeues stop immediately; the
/// in-flight item (if any) is allowed to finish before returning (spec
/// §5 "graceful stop").
pub async fn run_delivery_worker(
    queue: Arc<NatsQueue>,
    push_gateway: Arc<dyn PushGateway>,
    push_reg_repo: Arc<dyn PushRegistrationRepository>,
    config: DeliveryWorkerConfig,
    cancel: CancellationToken,
) -> Result<(), AppError> {
    let mut subscriber = queue.subscribe(&config.subject).await?;

    loop {
        let item = tokio::select! {
            _ = cancel.cancelled() => break,
            item = nats::next_item(&mut subscriber) => item,
        };

        let Some(item) = item else {
            break;
        };

        if let Err(e) = deliver(
            &item,
            push_gateway.as_ref(),
            push_reg_repo.as_ref(),
            &queue,
            &config,
        )
        .await
        {
            tracing::error!(notification_id = %item.notification_id, error = %e, "delivery attempt failed");
        }
    }

    Ok(())
}

async fn deliver(
    item: &NotificationQueueItem,
    push_gateway: &dyn PushGateway,
    push_reg_repo: &dyn PushRegistrationRepository,
    queue: &NatsQueue,
    config: &DeliveryWorkerConfig,
) -> Result<(), AppError> {
    let registrations = push_reg_repo.list_active_for_user(item.user_id).await?;
    if registrations.is_empty() {
        return Ok(());
    }

    let tokens: Vec<String> = registrations.iter().map(|r| r.token.clone()).collect();

    let result = push_gateway
        .send(&tokens, &item.title, &item.body, &item.data)
        .await;

    match result {
        Ok(push_result) => {
            for token in &push_result.failed_tokens {
                push_reg_repo.deactivate_by_token(token).await?;
            }
            Ok(())
        }
        Err(e) => {
            let attempt = item.retry_count + 1;
            if attempt > config.max_retries {
                tracing::warn!(
                    notification_id = %item.notification_id,
                    attempts = attempt,
                    "dropping notification after exceeding max_retries"
                );
                return Ok(());
            }

            let delay = backoff_delay(config, attempt);
            let retried = item.with_incremented_retry();
            let queue = queue.clone();
            let subject = config.subject.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = queue.enqueue(&subject, &retried).await {
                    tracing::warn!(error = %e, "failed to re-enqueue notification for retry");
                }
            });

            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_matches_s8_scenario() {
        let config = DeliveryWorkerConfig::default();
        let delays: Vec<u64> = (1..=5)
            .map(|n| backoff_delay(&config, n).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 16_000]);
    }

    #[test]
    fn delay_is_capped() {
        let config = DeliveryWorkerConfig {
            cap_ms: 5_000,
            ..DeliveryWorkerConfig::default()
        };
        assert_eq!(backoff_delay(&config, 10).as_millis(), 5_000);
    }
}
