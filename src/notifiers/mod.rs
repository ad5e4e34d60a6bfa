//! The `Notifier` capability: a pluggable delivery transport the
//! notification pipeline drives. `webhook` and `websocket` are the two
//! built-in transports; a host embedding the engine can supply its own.

mod webhook;
mod websocket;

pub use webhook::WebhookNotifier;
pub use websocket::WebSocketNotifier;

use crate::errors::CoreResult;
use crate::notify::NotificationEvent;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn id(&self) -> &str;
    fn kind(&self) -> &str;

    /// Delivers `event`, bounded by `deadline`. Transport errors that are
    /// worth retrying must be returned as `CoreError::Transient` — anything
    /// else is treated as a permanent failure by the pipeline.
    async fn notify(&self, deadline: Duration, event: &NotificationEvent) -> CoreResult<()>;

    /// Releases any held connection. Called once, on unregister.
    async fn close(&self);
}
