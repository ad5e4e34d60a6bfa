//! WebSocket notifier transport: a persistent outbound client connection,
//! reconnected lazily on the next delivery attempt after any failure.
//!
//! `axum`'s `ws` feature only serves inbound upgrades, so outbound delivery
//! goes through `tokio-tungstenite` instead — the same crate the broader
//! example pack reaches for when a service needs a WebSocket client rather
//! than a server.

use super::Notifier;
use crate::errors::{CoreError, CoreResult};
use crate::notify::NotificationEvent;
use async_trait::async_trait;
use futures_util::SinkExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WebSocketNotifier {
    id: String,
    url: String,
    conn: Mutex<Option<WsStream>>,
}

impl WebSocketNotifier {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            conn: Mutex::new(None),
        }
    }

    async fn ensure_connected(&self, guard: &mut Option<WsStream>) -> CoreResult<()> {
        if guard.is_some() {
            return Ok(());
        }
        let (stream, _response) = connect_async(&self.url)
            .await
            .map_err(|e| CoreError::Transient(e.to_string()))?;
        *guard = Some(stream);
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebSocketNotifier {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "websocket"
    }

    async fn notify(&self, deadline: Duration, event: &NotificationEvent) -> CoreResult<()> {
        let payload = serde_json::to_string(event)?;
        let mut guard = self.conn.lock().await;

        tokio::time::timeout(deadline, async {
            self.ensure_connected(&mut guard).await?;
            let Some(stream) = guard.as_mut() else {
                return Err(CoreError::Transient("websocket connection missing after connect".into()));
            };
            stream
                .send(Message::Text(payload))
                .await
                .map_err(|e| CoreError::Transient(e.to_string()))
        })
        .await
        .map_err(|_| CoreError::Transient("websocket notify timed out".into()))?
    }

    async fn close(&self) {
        let mut guard = self.conn.lock().await;
        if let Some(mut stream) = guard.take() {
            let _ = stream.close(None).await;
        }
    }
}
