//! The per-environment runtime: owns molecule state, executes ticks in
//! three phases, and drives an optional background run loop.

use super::engine::run_phase_b;
use super::rng::TickRng;
use crate::errors::{CoreError, CoreResult};
use crate::id::IdGenerator;
use crate::logging::LogSink;
use crate::model::Molecule;
use crate::notify::NotificationPipeline;
use crate::schema_builder::Schema;
use crate::snapshot::{self, Snapshot};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

struct EnvState {
    molecules: HashMap<String, Molecule>,
    tick: i64,
}

/// A single tenant: its own molecule population, schema, PRNG, and run
/// loop. Independent of every other `Environment` managed by the same
/// `EnvironmentManager`.
pub struct Environment {
    pub environment_id: String,
    state: RwLock<EnvState>,
    schema: RwLock<Arc<Schema>>,
    rng: TickRng,
    id_gen: Arc<dyn IdGenerator>,
    notifications: Arc<NotificationPipeline>,
    log: Arc<dyn LogSink>,
    snapshot_dir: Option<PathBuf>,
    snapshot_every_ticks: u64,
    run_handle: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
    running: AtomicBool,
}

impl Environment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        environment_id: String,
        schema: Schema,
        snapshot_dir: Option<PathBuf>,
        snapshot_every_ticks: u64,
        notifications: Arc<NotificationPipeline>,
        id_gen: Arc<dyn IdGenerator>,
        log: Arc<dyn LogSink>,
        restored: Option<Snapshot>,
    ) -> CoreResult<Self> {
        let (molecules, tick) = match restored {
            Some(s) => {
                for m in &s.molecules {
                    if !schema.species_declared(&m.species) {
                        return Err(CoreError::UnknownSpecies(m.species.clone()));
                    }
                }
                (
                    s.molecules.into_iter().map(|m| (m.id.clone(), m)).collect(),
                    s.tick,
                )
            }
            None => (HashMap::new(), 0),
        };

        Ok(Self {
            environment_id,
            state: RwLock::new(EnvState { molecules, tick }),
            schema: RwLock::new(Arc::new(schema)),
            rng: TickRng::from_entropy(),
            id_gen,
            notifications,
            log,
            snapshot_dir,
            snapshot_every_ticks,
            run_handle: Mutex::new(None),
            running: AtomicBool::new(false),
        })
    }

    pub async fn insert_molecule(&self, mut molecule: Molecule) -> CoreResult<Molecule> {
        let schema = self.schema.read().await;
        if !schema.species_declared(&molecule.species) {
            return Err(CoreError::UnknownSpecies(molecule.species.clone()));
        }
        drop(schema);

        let mut state = self.state.write().await;
        if molecule.id.is_empty() {
            molecule.id = self.id_gen.next_id();
        } else if state.molecules.contains_key(&molecule.id) {
            return Err(CoreError::DuplicateId(molecule.id.clone()));
        }
        molecule.created_at = state.tick;
        molecule.last_touched_at = state.tick;
        state.molecules.insert(molecule.id.clone(), molecule.clone());
        Ok(molecule)
    }

    pub async fn molecules(&self) -> Vec<Molecule> {
        self.state.read().await.molecules.values().cloned().collect()
    }

    pub async fn current_tick(&self) -> i64 {
        self.state.read().await.tick
    }

    pub async fn schema_name(&self) -> String {
        self.schema.read().await.name.clone()
    }

    pub async fn swap_schema(&self, schema: Schema) {
        let mut guard = self.schema.write().await;
        *guard = Arc::new(schema);
    }

    /// Runs a single tick end to end: Phase A snapshot under the write
    /// lock, Phase B lock-free compute, Phase C apply under the write lock,
    /// notification submission, and the periodic snapshot trigger.
    pub async fn tick(&self) {
        let (snapshot_vec, tick) = {
            let mut state = self.state.write().await;
            state.tick += 1;
            (state.molecules.values().cloned().collect::<Vec<_>>(), state.tick)
        };

        let schema = self.schema.read().await.clone();
        let fired_at_unix_ms = now_unix_ms();
        let output = run_phase_b(&self.environment_id, &snapshot_vec, &schema, &self.rng, tick, fired_at_unix_ms);

        {
            let mut state = self.state.write().await;
            for id in &output.consumed {
                state.molecules.remove(id);
            }
            for (id, updated) in output.changes {
                if !output.consumed.contains(&id) {
                    state.molecules.insert(id, updated);
                }
            }
            for mut m in output.new_molecules {
                if m.id.is_empty() {
                    m.id = self.id_gen.next_id();
                }
                state.molecules.insert(m.id.clone(), m);
            }
        }

        for (event, notifier_ids) in output.events {
            self.notifications.submit(event, notifier_ids, self.log.as_ref());
        }

        if self.snapshot_every_ticks > 0 && tick as u64 % self.snapshot_every_ticks == 0 {
            if let Err(e) = self.save_snapshot_now().await {
                warn!(environment_id = %self.environment_id, error = %e, "periodic snapshot save failed");
            }
        }
    }

    /// Starts the background tick loop at `interval`. Idempotent: a no-op
    /// if the loop is already running.
    pub async fn start(self: &Arc<Self>, interval: Duration) {
        let mut guard = self.run_handle.lock().await;
        if guard.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let env = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        info!(environment_id = %env.environment_id, "tick loop cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        env.tick().await;
                    }
                }
            }
        });

        *guard = Some((cancel, handle));
        self.running.store(true, Ordering::SeqCst);
    }

    /// Stops the background tick loop. Idempotent: a no-op if not running.
    pub async fn stop(&self) {
        let mut guard = self.run_handle.lock().await;
        if let Some((cancel, handle)) = guard.take() {
            cancel.cancel();
            let _ = handle.await;
        }
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Saves the current state to disk, returning the path written to, or
    /// `None` when no snapshot directory is configured (a no-op write).
    pub async fn save_snapshot_now(&self) -> CoreResult<Option<PathBuf>> {
        let snapshot = self.to_snapshot().await;
        snapshot::save_snapshot(self.snapshot_dir.as_deref(), &snapshot)?;
        Ok(self
            .snapshot_dir
            .as_deref()
            .map(|dir| snapshot::snapshot_path(dir, &self.environment_id)))
    }

    /// Builds a `Snapshot` of the current in-memory state without touching
    /// disk — used by the read-only `GET .../snapshot` control-plane route.
    pub async fn to_snapshot(&self) -> Snapshot {
        let schema_name = self.schema_name().await;
        let (molecules, tick) = {
            let state = self.state.read().await;
            (state.molecules.values().cloned().collect::<Vec<_>>(), state.tick)
        };
        Snapshot {
            environment_id: self.environment_id.clone(),
            schema_name,
            tick,
            molecules,
        }
    }
}

fn now_unix_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
