//! Multi-tenant environment registry: create, fetch, delete, and hot-swap
//! the schema of independently-ticking environments.

use crate::errors::{CoreError, CoreResult};
use crate::id::IdGenerator;
use crate::model::SchemaConfig;
use crate::notify::NotificationPipeline;
use crate::logging::LogSink;
use crate::schema_builder::build_schema_from_config;
use crate::snapshot;
use crate::tick::Environment;
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub struct EnvironmentManager {
    environments: DashMap<String, Arc<Environment>>,
    snapshot_dir: Option<PathBuf>,
    snapshot_every_ticks: u64,
    notifications: Arc<NotificationPipeline>,
    log: Arc<dyn LogSink>,
    id_gen: Arc<dyn IdGenerator>,
}

impl EnvironmentManager {
    pub fn new(
        snapshot_dir: Option<PathBuf>,
        snapshot_every_ticks: u64,
        notifications: Arc<NotificationPipeline>,
        log: Arc<dyn LogSink>,
        id_gen: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            environments: DashMap::new(),
            snapshot_dir,
            snapshot_every_ticks,
            notifications,
            log,
            id_gen,
        }
    }

    /// Creates an environment, restoring it from disk first if a snapshot
    /// for `environment_id` already exists under the configured snapshot
    /// directory.
    pub fn create(&self, environment_id: impl Into<String>, config: SchemaConfig) -> CoreResult<Arc<Environment>> {
        let environment_id = environment_id.into();
        if self.environments.contains_key(&environment_id) {
            return Err(CoreError::AlreadyExists(format!("environment {environment_id}")));
        }

        let schema = build_schema_from_config(config)?;
        let restored = self
            .snapshot_dir
            .as_deref()
            .map(|dir| snapshot::load_snapshot(dir, &environment_id))
            .transpose()?
            .flatten();

        let env = Arc::new(Environment::new(
            environment_id.clone(),
            schema,
            self.snapshot_dir.clone(),
            self.snapshot_every_ticks,
            self.notifications.clone(),
            self.id_gen.clone(),
            self.log.clone(),
            restored,
        )?);
        self.environments.insert(environment_id, env.clone());
        Ok(env)
    }

    pub fn get(&self, environment_id: &str) -> CoreResult<Arc<Environment>> {
        self.environments
            .get(environment_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| CoreError::not_found(format!("environment {environment_id}")))
    }

    pub async fn delete(&self, environment_id: &str) -> CoreResult<()> {
        let removed = self
            .environments
            .remove(environment_id)
            .ok_or_else(|| CoreError::not_found(format!("environment {environment_id}")))?;
        removed.1.stop().await;
        Ok(())
    }

    /// Swaps the schema of a running environment. Reactions installed under
    /// the old schema finish their current tick before the swap is
    /// observed — the lock is only held long enough to replace the `Arc`.
    pub async fn update_schema(&self, environment_id: &str, config: SchemaConfig) -> CoreResult<()> {
        let env = self.get(environment_id)?;
        let schema = build_schema_from_config(config)?;
        env.swap_schema(schema).await;
        Ok(())
    }

    pub fn list(&self) -> Vec<String> {
        self.environments.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UuidGenerator;
    use crate::logging::TracingLogSink;
    use crate::model::Species;
    use crate::notify::NotifierRegistry;

    fn manager() -> EnvironmentManager {
        let registry = Arc::new(NotifierRegistry::new());
        let pipeline = NotificationPipeline::start(registry, 8, 1, Arc::new(TracingLogSink));
        EnvironmentManager::new(None, 0, pipeline, Arc::new(TracingLogSink), Arc::new(UuidGenerator))
    }

    fn schema_config() -> SchemaConfig {
        SchemaConfig {
            name: "s1".into(),
            species: vec![Species::new("A")],
            reactions: Vec::new(),
        }
    }

    #[test]
    fn create_then_get_returns_the_same_environment() {
        let manager = manager();
        manager.create("env1", schema_config()).unwrap();
        assert!(manager.get("env1").is_ok());
        assert_eq!(manager.list(), vec!["env1".to_string()]);
    }

    #[test]
    fn duplicate_create_is_already_exists() {
        let manager = manager();
        manager.create("env1", schema_config()).unwrap();
        let err = manager.create("env1", schema_config()).unwrap_err();
        assert!(matches!(err, CoreError::AlreadyExists(_)));
    }

    #[test]
    fn get_missing_environment_is_not_found() {
        let manager = manager();
        let err = manager.get("nope").unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_from_the_registry() {
        let manager = manager();
        manager.create("env1", schema_config()).unwrap();
        manager.delete("env1").await.unwrap();
        assert!(manager.get("env1").is_err());
    }

    #[tokio::test]
    async fn update_schema_on_missing_environment_is_not_found() {
        let manager = manager();
        let err = manager.update_schema("nope", schema_config()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
