//! HTTP webhook notifier transport, built on `reqwest` for outbound
//! delivery.

use super::Notifier;
use crate::errors::{CoreError, CoreResult};
use crate::notify::NotificationEvent;
use async_trait::async_trait;
use std::time::Duration;

pub struct WebhookNotifier {
    id: String,
    url: String,
    headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_headers(id, url, Vec::new())
    }

    pub fn with_headers(id: impl Into<String>, url: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            headers,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, deadline: Duration, event: &NotificationEvent) -> CoreResult<()> {
        let mut request = self.client.post(&self.url).json(event).timeout(deadline);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Transient(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CoreError::Transient(format!(
                "webhook {} returned {}",
                self.url,
                response.status()
            )))
        }
    }

    async fn close(&self) {}
}
