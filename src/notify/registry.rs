//! Registry of notifier transports and in-process callbacks:
//! `RegisterNotifier`/`Unregister`, `RegisterCallback`/`UnregisterCallback`.
//! Notifiers and callbacks live in
//! separate namespaces — a callback is a lightweight escape hatch for a host
//! embedding the engine directly, not a `Notifier` transport.

use super::event::NotificationEvent;
use crate::errors::{CoreError, CoreResult};
use crate::notifiers::Notifier;
use dashmap::DashMap;
use std::sync::Arc;

pub type NotifyCallback = Arc<dyn Fn(&NotificationEvent) + Send + Sync>;

#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: DashMap<String, Arc<dyn Notifier>>,
    callbacks: DashMap<String, NotifyCallback>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_notifier(&self, notifier: Arc<dyn Notifier>) -> CoreResult<()> {
        let id = notifier.id().to_string();
        if self.notifiers.contains_key(&id) {
            return Err(CoreError::Conflict(format!("notifier {id} already registered")));
        }
        self.notifiers.insert(id, notifier);
        Ok(())
    }

    pub async fn unregister(&self, id: &str) -> CoreResult<()> {
        let removed = self
            .notifiers
            .remove(id)
            .ok_or_else(|| CoreError::not_found(format!("notifier {id}")))?;
        removed.1.close().await;
        Ok(())
    }

    pub fn register_callback(&self, id: impl Into<String>, cb: NotifyCallback) -> CoreResult<()> {
        let id = id.into();
        if self.callbacks.contains_key(&id) {
            return Err(CoreError::Conflict(format!("callback {id} already registered")));
        }
        self.callbacks.insert(id, cb);
        Ok(())
    }

    pub fn unregister_callback(&self, id: &str) -> CoreResult<()> {
        self.callbacks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found(format!("callback {id}")))
    }

    /// `(id, kind)` for every registered notifier transport.
    pub fn list(&self) -> Vec<(String, String)> {
        self.notifiers
            .iter()
            .map(|e| (e.key().clone(), e.value().kind().to_string()))
            .collect()
    }

    /// An empty or absent `ids` targets nothing — a reaction that doesn't
    /// name any notifiers gets zero external deliveries, not a broadcast.
    pub(crate) fn resolve_targets(&self, ids: Option<&[String]>) -> Vec<Arc<dyn Notifier>> {
        match ids {
            Some(ids) if !ids.is_empty() => ids
                .iter()
                .filter_map(|id| self.notifiers.get(id).map(|e| e.value().clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn resolve_callbacks(&self) -> Vec<NotifyCallback> {
        self.callbacks.iter().map(|e| e.value().clone()).collect()
    }

    pub(crate) fn has_callbacks(&self) -> bool {
        !self.callbacks.is_empty()
    }
}
