//! Decides when the sync pipelines run.
//!
//! Every job (full sync, push of all entities, push of one entity) goes
//! through one queue drained by a single worker task, so at most one sync
//! operation touches the store and the backend at a time. Triggers only
//! enqueue: sign-in, the periodic timer, connectivity coming back, and local
//! writes reported as [`DomainEvent`]s.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use expensehud_core::events::{DomainEvent, DomainEventSink};
use expensehud_core::sync::{
    SyncCycleResult, SyncCycleStatus, SyncCycleTrigger, SyncEntity, SyncState, SYNC_INTERVAL_SECS,
};

use crate::config::RemoteConfig;
use crate::engine::{AuthContext, SyncEngine, SyncReport};
use crate::error::{CloudSyncError, Result};

const UNREACHABLE_MESSAGE: &str = "Remote backend unreachable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncJob {
    /// Push every entity, flush deletes, then pull every entity.
    FullSync,
    /// Push every entity and flush deletes.
    PushAll,
    PushEntity(SyncEntity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncRequest {
    pub job: SyncJob,
    pub trigger: SyncCycleTrigger,
}

impl SyncRequest {
    pub fn new(job: SyncJob, trigger: SyncCycleTrigger) -> Self {
        Self { job, trigger }
    }

    pub fn full(trigger: SyncCycleTrigger) -> Self {
        Self::new(SyncJob::FullSync, trigger)
    }
}

/// Published sync state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncStatusSnapshot {
    pub state: SyncState,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_result: Option<SyncCycleResult>,
}

/// Resolves once the submitted job has run.
#[derive(Debug)]
pub struct SyncTicket {
    reply: oneshot::Receiver<Result<SyncCycleResult>>,
}

impl SyncTicket {
    pub async fn wait(self) -> Result<SyncCycleResult> {
        self.reply.await.map_err(|_| CloudSyncError::WorkerStopped)?
    }
}

struct QueuedJob {
    request: SyncRequest,
    reply: Option<oneshot::Sender<Result<SyncCycleResult>>>,
}

struct Shared {
    engine: Arc<SyncEngine>,
    auth: Arc<dyn AuthContext>,
    status: watch::Sender<SyncStatusSnapshot>,
    online: AtomicBool,
}

impl Shared {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    async fn run(&self, request: SyncRequest) -> Result<SyncCycleResult> {
        let started = Instant::now();

        let Some(identity) = self.auth.current_identity() else {
            debug!("[Sync] Skipping {:?}: not signed in", request.job);
            return Ok(SyncCycleResult::skipped(
                SyncCycleStatus::NotAuthenticated,
                request.trigger,
            ));
        };
        if !self.is_online() {
            debug!("[Sync] Skipping {:?}: offline", request.job);
            self.status.send_modify(|status| status.state = SyncState::Offline);
            return Ok(SyncCycleResult::skipped(
                SyncCycleStatus::Offline,
                request.trigger,
            ));
        }

        self.status
            .send_modify(|status| status.state = SyncState::Syncing);

        let outcome = match request.job {
            SyncJob::FullSync => self.engine.full_sync(&identity).await,
            SyncJob::PushAll => self.engine.push(&identity).await.map(|push| SyncReport {
                push,
                ..SyncReport::default()
            }),
            SyncJob::PushEntity(entity) => {
                self.engine
                    .push_entity(&identity, entity)
                    .await
                    .map(|push| SyncReport {
                        push,
                        ..SyncReport::default()
                    })
            }
        };
        let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        let online = self.is_online();

        match outcome {
            Ok(report) => {
                let unreachable = report.calls().all_unavailable();
                let result = SyncCycleResult {
                    status: if unreachable {
                        SyncCycleStatus::Unreachable
                    } else {
                        SyncCycleStatus::Ok
                    },
                    trigger: request.trigger,
                    pushed_count: report.push.pushed,
                    pulled_count: report.pull.pulled() + report.push.seeds.pulled(),
                    flushed_count: report.push.flush.flushed,
                    duration_ms,
                };

                if unreachable {
                    warn!(
                        "[Sync] {:?} could not reach the backend ({} call(s) failed)",
                        request.job,
                        report.calls().attempted
                    );
                } else {
                    debug!(
                        "[Sync] {:?} complete trigger={:?} pushed={} pulled={} flushed={} duration_ms={}",
                        request.job,
                        request.trigger,
                        result.pushed_count,
                        result.pulled_count,
                        result.flushed_count,
                        duration_ms
                    );
                }

                let published = result.clone();
                self.status.send_modify(move |status| {
                    if unreachable {
                        status.state = SyncState::Error;
                        status.last_error = Some(UNREACHABLE_MESSAGE.to_string());
                    } else {
                        status.state = SyncState::Idle;
                        status.last_error = None;
                        status.last_synced_at = Some(Utc::now());
                    }
                    if !online {
                        status.state = SyncState::Offline;
                    }
                    status.last_result = Some(published);
                });
                Ok(result)
            }
            Err(err) => {
                error!("[Sync] {:?} failed: {}", request.job, err);
                let message = err.to_string();
                self.status.send_modify(move |status| {
                    status.state = if online {
                        SyncState::Error
                    } else {
                        SyncState::Offline
                    };
                    status.last_error = Some(message);
                });
                Err(err)
            }
        }
    }
}

async fn run_worker(shared: Arc<Shared>, mut jobs: mpsc::UnboundedReceiver<QueuedJob>) {
    while let Some(job) = jobs.recv().await {
        let result = shared.run(job.request).await;
        if let Some(reply) = job.reply {
            let _ = reply.send(result);
        }
    }
    debug!("[Sync] Worker stopped");
}

pub struct SyncOrchestrator {
    shared: Arc<Shared>,
    jobs: mpsc::UnboundedSender<QueuedJob>,
    interval: Duration,
    periodic: Mutex<Option<JoinHandle<()>>>,
    worker: JoinHandle<()>,
}

impl SyncOrchestrator {
    /// Spawns the sync worker. Must be called from within a tokio runtime.
    /// Starts online and idle; nothing runs until a trigger fires.
    pub fn start(engine: Arc<SyncEngine>, auth: Arc<dyn AuthContext>) -> Self {
        Self::with_interval(engine, auth, Duration::from_secs(SYNC_INTERVAL_SECS))
    }

    /// Like [`SyncOrchestrator::start`], with the periodic interval taken from
    /// `config`.
    pub fn from_config(
        engine: Arc<SyncEngine>,
        auth: Arc<dyn AuthContext>,
        config: &RemoteConfig,
    ) -> Self {
        Self::with_interval(engine, auth, config.sync_interval)
    }

    pub fn with_interval(
        engine: Arc<SyncEngine>,
        auth: Arc<dyn AuthContext>,
        interval: Duration,
    ) -> Self {
        let (status, _) = watch::channel(SyncStatusSnapshot::default());
        let shared = Arc::new(Shared {
            engine,
            auth,
            status,
            online: AtomicBool::new(true),
        });
        let (jobs, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(Arc::clone(&shared), receiver));

        Self {
            shared,
            jobs,
            interval,
            periodic: Mutex::new(None),
            worker,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn status(&self) -> SyncStatusSnapshot {
        self.shared.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStatusSnapshot> {
        self.shared.status.subscribe()
    }

    pub fn is_online(&self) -> bool {
        self.shared.is_online()
    }

    /// Queues a job behind any job already waiting.
    pub fn submit(&self, request: SyncRequest) -> SyncTicket {
        let (reply, receiver) = oneshot::channel();
        self.enqueue(request, Some(reply));
        SyncTicket { reply: receiver }
    }

    pub fn sync_now(&self) -> SyncTicket {
        self.submit(SyncRequest::full(SyncCycleTrigger::Manual))
    }

    fn enqueue(
        &self,
        request: SyncRequest,
        reply: Option<oneshot::Sender<Result<SyncCycleResult>>>,
    ) {
        if self.jobs.send(QueuedJob { request, reply }).is_err() {
            warn!("[Sync] Worker stopped; dropping {:?}", request.job);
        }
    }

    /// Runs one full sync and starts the periodic timer.
    pub async fn on_signed_in(&self) -> SyncTicket {
        let ticket = self.submit(SyncRequest::full(SyncCycleTrigger::SignedIn));
        self.start_periodic().await;
        ticket
    }

    /// Stops the periodic timer. Jobs already queued still run.
    pub async fn stop(&self) {
        if let Some(handle) = self.periodic.lock().await.take() {
            handle.abort();
            info!("[Sync] Periodic sync stopped");
        }
    }

    pub async fn is_periodic_running(&self) -> bool {
        self.periodic
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn start_periodic(&self) {
        let mut guard = self.periodic.lock().await;
        if let Some(handle) = guard.as_ref() {
            if !handle.is_finished() {
                return;
            }
            guard.take();
        }

        let jobs = self.jobs.clone();
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let job = QueuedJob {
                    request: SyncRequest::full(SyncCycleTrigger::Periodic),
                    reply: None,
                };
                if jobs.send(job).is_err() {
                    break;
                }
            }
        });
        *guard = Some(handle);
        info!("[Sync] Periodic sync every {}s", interval.as_secs());
    }

    /// Records a connectivity change. Going offline stops remote calls;
    /// coming back online queues a full sync.
    pub fn set_online(&self, online: bool) {
        let was_online = self.shared.online.swap(online, Ordering::SeqCst);

        if !online {
            self.shared
                .status
                .send_modify(|status| status.state = SyncState::Offline);
            if was_online {
                info!("[Sync] Connectivity lost");
            }
            return;
        }

        if !was_online {
            info!("[Sync] Connectivity restored");
            self.shared.status.send_modify(|status| {
                if status.state == SyncState::Offline {
                    status.state = SyncState::Idle;
                }
            });
            self.enqueue(
                SyncRequest::full(SyncCycleTrigger::ConnectivityRestored),
                None,
            );
        }
    }
}

impl DomainEventSink for SyncOrchestrator {
    fn emit(&self, event: DomainEvent) {
        if self.shared.auth.current_identity().is_none() {
            return;
        }
        let job = match event {
            DomainEvent::RecordsChanged { entity, .. } => SyncJob::PushEntity(entity),
            // A full push also flushes the delete queue.
            DomainEvent::RecordDeleted { .. } => SyncJob::PushAll,
        };
        self.enqueue(
            SyncRequest::new(job, SyncCycleTrigger::LocalMutation),
            None,
        );
    }
}

impl Drop for SyncOrchestrator {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.periodic.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
        self.worker.abort();
    }
}
