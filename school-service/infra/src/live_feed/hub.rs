//! Per-tenant publish/subscribe registry for the live-feed socket (C10).
//! Grounded on `groblegark-coop`'s WS bridge (`crates/mux/src/state.rs`,
//! `transport/ws.rs`): a guarded registry of outbound channels, and a
//! bounded channel per subscriber so a slow dashboard gets dropped
//! instead of backing up the whole hub.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

const SUBSCRIBER_BUFFER: usize = 32;

/// Wire frame the socket emits (spec §6 "WebSocket"): `{type, payload}`.
#[derive(Debug, Clone, Serialize)]
pub struct LiveFeedEvent {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub payload: Value,
}

impl LiveFeedEvent {
    pub fn new_attendance(payload: Value) -> Self {
        Self { event_type: "new_attendance", payload }
    }

    pub fn stats_update(payload: Value) -> Self {
        Self { event_type: "stats_update", payload }
    }

    pub fn leaderboard_update(payload: Value) -> Self {
        Self { event_type: "leaderboard_update", payload }
    }

    pub fn ping() -> Self {
        Self { event_type: "ping", payload: Value::Null }
    }
}

struct Subscriber {
    sender: mpsc::Sender<LiveFeedEvent>,
    /// `Some` narrows a homeroom_teacher's subscription to one class
    /// (spec §4.10); `None` sees every event for the tenant.
    class_id: Option<Uuid>,
}

/// A live handle a connection holds onto; dropping it (or closing the
/// socket) should be followed by `LiveFeedHub::unsubscribe`.
pub struct Subscription {
    pub tenant_id: Uuid,
    pub subscriber_id: Uuid,
    pub receiver: mpsc::Receiver<LiveFeedEvent>,
}

#[derive(Default)]
pub struct LiveFeedHub {
    tenants: RwLock<HashMap<Uuid, HashMap<Uuid, Subscriber>>>,
}

impl LiveFeedHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn subscribe(&self, tenant_id: Uuid, class_id: Option<Uuid>) -> Subscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let subscriber_id = Uuid::new_v4();

        let mut tenants = self.tenants.write().await;
        tenants
            .entry(tenant_id)
            .or_default()
            .insert(subscriber_id, Subscriber { sender: tx, class_id });

        Subscription { tenant_id, subscriber_id, receiver: rx }
    }

    pub async fn unsubscribe(&self, tenant_id: Uuid, subscriber_id: Uuid) {
        let mut tenants = self.tenants.write().await;
        if let Some(subs) = tenants.get_mut(&tenant_id) {
            subs.remove(&subscriber_id);
            if subs.is_empty() {
                tenants.remove(&tenant_id);
            }
        }
    }

    /// Delivers `event` to every subscriber of `tenant_id` whose
    /// `class_id` filter is unset or matches `class_id`. At-most-once:
    /// a subscriber whose buffer is full is dropped rather than
    /// blocking the publisher (spec §4.10) — the persisted notification
    /// row remains the durable channel.
    pub async fn publish(&self, tenant_id: Uuid, class_id: Option<Uuid>, event: LiveFeedEvent) {
        let dead = {
            let tenants = self.tenants.read().await;
            let Some(subs) = tenants.get(&tenant_id) else {
                return;
            };

            let mut dead = Vec::new();
            for (id, sub) in subs.iter() {
                if sub.class_id.is_some() && sub.class_id != class_id {
                    continue;
                }
                if sub.sender.try_send(event.clone()).is_err() {
                    dead.push(*id);
                }
            }
            dead
        };

        if !dead.is_empty() {
            let mut tenants = self.tenants.write().await;
            if let Some(subs) = tenants.get_mut(&tenant_id) {
                for id in dead {
                    subs.remove(&id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscriber_receives_tenant_wide_event() {
        let hub = LiveFeedHub::new();
        let tenant = Uuid::new_v4();
        let mut sub = hub.subscribe(tenant, None).await;

        hub.publish(tenant, None, LiveFeedEvent::new_attendance(json!({"ok": true}))).await;

        let event = sub.receiver.recv().await.unwrap();
        assert_eq!(event.event_type, "new_attendance");
    }

    #[tokio::test]
    async fn class_scoped_subscriber_ignores_other_classes() {
        let hub = LiveFeedHub::new();
        let tenant = Uuid::new_v4();
        let class_a = Uuid::new_v4();
        let class_b = Uuid::new_v4();
        let mut sub = hub.subscribe(tenant, Some(class_a)).await;

        hub.publish(tenant, Some(class_b), LiveFeedEvent::new_attendance(json!({}))).await;
        hub.publish(tenant, Some(class_a), LiveFeedEvent::new_attendance(json!({"class": "a"}))).await;

        let event = sub.receiver.recv().await.unwrap();
        assert_eq!(event.payload, json!({"class": "a"}));
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let hub = LiveFeedHub::new();
        let tenant = Uuid::new_v4();
        let sub = hub.subscribe(tenant, None).await;
        hub.unsubscribe(tenant, sub.subscriber_id).await;

        hub.publish(tenant, None, LiveFeedEvent::ping()).await;
        assert!(hub.tenants.read().await.get(&tenant).is_none());
    }
}
