//! Live attendance feed websocket (C10). Structurally grounded on
//! `prospectorengine-prospector-btc`'s socket handler: split
//! sender/receiver, a `select!` loop pushing hub events downstream
//! and a periodic ping, with client frames read on the other arm.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use shared_auth::{authorize, Capability, TenantContext};
use shared_error::AppError;
use tokio::time::{interval, Duration};
use uuid::Uuid;

use crate::state::AppState;

const PING_INTERVAL_SECS: u64 = 30;

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    Subscribe { class_id: Option<Uuid> },
}

pub async fn upgrade(
    State(state): State<AppState>,
    tenant: TenantContext,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    authorize(tenant.ctx.role, Capability::ViewLiveFeed)?;
    let tenant_id = tenant.tenant_id;

    // Unscoped on connect; a homeroom_teacher narrows to their class
    // with a `{"type":"subscribe","class_id":...}` frame once open.
    Ok(ws.on_upgrade(move |socket| run(socket, state, tenant_id, None)))
}

async fn run(socket: WebSocket, state: AppState, tenant_id: Uuid, initial_class_id: Option<Uuid>) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscription = state.live_feed.subscribe(tenant_id, initial_class_id).await;
    let mut ping_timer = interval(Duration::from_secs(PING_INTERVAL_SECS));

    loop {
        tokio::select! {
            _ = ping_timer.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
            event = subscription.receiver.recv() => {
                match event {
                    Some(event) => {
                        let Ok(text) = serde_json::to_string(&event) else { continue };
                        if sender.send(Message::Text(text)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(ClientFrame::Subscribe { class_id }) = serde_json::from_str(&text) {
                            state.live_feed.unsubscribe(subscription.tenant_id, subscription.subscriber_id).await;
                            subscription = state.live_feed.subscribe(tenant_id, class_id).await;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    state.live_feed.unsubscribe(subscription.tenant_id, subscription.subscriber_id).await;
}
