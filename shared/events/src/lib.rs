//! Wire shapes and transport for the notification fan-out pipeline (C8,
//! C9): the durable queue item, the NATS client wrapper that moves it,
//! and the vendor-opaque push-gateway interface workers call into.

pub mod nats;
pub mod push;
pub mod queue;

pub use nats::NatsQueue;
pub use push::{PushGateway, PushResult};
pub use queue::NotificationQueueItem;
