//! The async notification pipeline: a bounded job queue drained by one or
//! more worker tasks, each delivery retried with exponential backoff.

use super::event::NotificationEvent;
use super::registry::NotifierRegistry;
use crate::logging::LogSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const MAX_ATTEMPTS: u32 = 4;
const BASE_BACKOFF: Duration = Duration::from_millis(100);
const PER_NOTIFIER_DEADLINE: Duration = Duration::from_secs(5);

struct Job {
    event: NotificationEvent,
    notifier_ids: Option<Vec<String>>,
}

/// Owns the job queue and its worker tasks. `submit` never blocks the tick
/// loop: a full queue drops the job and logs a warning rather than
/// back-pressuring the caller.
pub struct NotificationPipeline {
    tx: mpsc::Sender<Job>,
    cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
    registry: Arc<NotifierRegistry>,
}

impl NotificationPipeline {
    pub fn start(
        registry: Arc<NotifierRegistry>,
        queue_capacity: usize,
        worker_count: usize,
        log: Arc<dyn LogSink>,
    ) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let cancel = CancellationToken::new();
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = Vec::with_capacity(worker_count.max(1));
        for _ in 0..worker_count.max(1) {
            let rx = rx.clone();
            let registry = registry.clone();
            let cancel = cancel.clone();
            let log = log.clone();
            workers.push(tokio::spawn(async move {
                worker_loop(rx, registry, cancel, log).await;
            }));
        }

        Arc::new(Self {
            tx,
            cancel,
            workers: Mutex::new(workers),
            registry,
        })
    }

    /// Non-blocking enqueue. An empty or absent `notifier_ids` targets no
    /// external notifier at all; if no callback is registered either, the
    /// event is dropped without ever touching the queue.
    pub fn submit(&self, event: NotificationEvent, notifier_ids: Option<Vec<String>>, log: &dyn LogSink) {
        let no_targets = notifier_ids.as_deref().map_or(true, |ids| ids.is_empty());
        if no_targets && !self.registry.has_callbacks() {
            return;
        }
        let job = Job { event, notifier_ids };
        if let Err(mpsc::error::TrySendError::Full(_)) = self.tx.try_send(job) {
            log.warn("notification queue full, dropping event");
        }
    }

    /// Idempotent shutdown: cancels the workers and waits for them to drain
    /// whatever job they're mid-delivery on.
    pub async fn close(&self) {
        self.cancel.cancel();
        let mut workers = self.workers.lock().await;
        for handle in workers.drain(..) {
            let _ = handle.await;
        }
    }
}

async fn worker_loop(
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    registry: Arc<NotifierRegistry>,
    cancel: CancellationToken,
    log: Arc<dyn LogSink>,
) {
    loop {
        let job = {
            let mut rx = rx.lock().await;
            tokio::select! {
                _ = cancel.cancelled() => None,
                job = rx.recv() => job,
            }
        };
        let Some(job) = job else {
            break;
        };
        process_job(&registry, job, log.as_ref()).await;
    }
}

async fn process_job(registry: &NotifierRegistry, job: Job, log: &dyn LogSink) {
    for notifier in registry.resolve_targets(job.notifier_ids.as_deref()) {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match notifier.notify(PER_NOTIFIER_DEADLINE, &job.event).await {
                Ok(()) => break,
                Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                    let backoff = BASE_BACKOFF * 2u32.pow(attempt - 1);
                    log.warn(&format!(
                        "notifier {} attempt {attempt} failed: {e}; retrying in {backoff:?}",
                        notifier.id()
                    ));
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    log.error(&format!("notifier {} failed permanently: {e}", notifier.id()));
                    break;
                }
            }
        }
    }

    for cb in registry.resolve_callbacks() {
        cb(&job.event);
    }
}
