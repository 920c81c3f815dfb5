//! Job monitor
//!
//! The single owner of the loop token, the accessible instance set, the
//! job table and the error log. Cloning a `JobMonitor` yields another
//! handle to the same state.
//!
//! Shared state sits behind a mutex that is never held across an `.await`,
//! so every mutation happens between suspension points and passes only
//! interleave at I/O boundaries.

use beacon_core::domain::job::Job;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::error::{ErrorLog, LoggedError, MonitorError};
use crate::repository::ServerRepository;
use crate::scheduler::{Cadence, LoopToken, TokenSource};
use crate::table::JobTable;

const EVENT_CAPACITY: usize = 16;

/// Notifications emitted to observers of the job table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// The job table changed; re-read it
    JobsRefreshed,
}

pub(crate) struct MonitorState {
    pub tokens: TokenSource,
    pub cadence: Cadence,
    pub table: JobTable,
    pub accessible: BTreeSet<i64>,
    pub errors: ErrorLog,
    pub probe_task: Option<JoinHandle<()>>,
}

struct Shared {
    config: MonitorConfig,
    repository: Arc<dyn ServerRepository>,
    state: Mutex<MonitorState>,
    events: broadcast::Sender<MonitorEvent>,
}

/// Keeps a local view of jobs across all accessible instances in sync
/// with the server
#[derive(Clone)]
pub struct JobMonitor {
    shared: Arc<Shared>,
}

impl JobMonitor {
    /// Creates a stopped monitor
    ///
    /// # Arguments
    /// * `config` - Polling cadences
    /// * `repository` - Server access used by every pass
    pub fn new(config: MonitorConfig, repository: Arc<dyn ServerRepository>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                config,
                repository,
                state: Mutex::new(MonitorState {
                    tokens: TokenSource::default(),
                    cadence: Cadence::default(),
                    table: JobTable::new(),
                    accessible: BTreeSet::new(),
                    errors: ErrorLog::default(),
                    probe_task: None,
                }),
                events,
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.shared.config
    }

    // =============================================================================
    // Lifecycle
    // =============================================================================

    /// Builds the accessible instance set, starts the instance probe and
    /// the reconciliation loop
    pub async fn start(&self) -> LoopToken {
        info!("Starting job monitor");
        self.refresh_accessible_instances(true).await;
        self.restart_loop()
    }

    /// Stops the instance probe and makes every in-flight pass stale
    ///
    /// Requests already sent are allowed to finish; their results are dropped.
    pub fn stop(&self) {
        let probe = {
            let mut state = self.state();
            state.tokens.invalidate();
            state.probe_task.take()
        };
        if let Some(probe) = probe {
            probe.abort();
        }
        info!("Job monitor stopped");
    }

    /// Forgets every known job, rebuilds the accessible set and restarts
    /// the loop
    ///
    /// Passes in flight are retired together with the table, so nothing
    /// from before the reset is merged while the refresh runs.
    ///
    /// Use whenever the remote world may have changed wholesale: a login,
    /// an instance being attached or detached, a cache purge.
    pub async fn reset(&self) -> LoopToken {
        info!("Resetting job monitor");
        {
            let mut state = self.state();
            state.tokens.invalidate();
            state.table.clear();
        }
        self.refresh_accessible_instances(false).await;
        self.restart_loop()
    }

    pub fn is_running(&self) -> bool {
        self.state().tokens.current().is_some()
    }

    /// Subscribes to table change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.shared.events.subscribe()
    }

    // =============================================================================
    // Snapshots
    // =============================================================================

    pub fn jobs(&self) -> Vec<Job> {
        self.state().table.iter().cloned().collect()
    }

    pub fn job(&self, job_id: i64) -> Option<Job> {
        self.state().table.get(job_id).cloned()
    }

    pub fn jobs_for_instance(&self, instance_id: i64) -> Vec<Job> {
        self.state().table.jobs_for_instance(instance_id)
    }

    pub fn accessible_instances(&self) -> BTreeSet<i64> {
        self.state().accessible.clone()
    }

    /// Errors recorded by the most recent pass
    pub fn errors(&self) -> Vec<LoggedError> {
        self.state().errors.entries().to_vec()
    }

    // =============================================================================
    // Internals shared by the scheduler and services
    // =============================================================================

    pub(crate) fn state(&self) -> MutexGuard<'_, MonitorState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn repository(&self) -> &dyn ServerRepository {
        self.shared.repository.as_ref()
    }

    pub(crate) fn is_current(&self, token: LoopToken) -> bool {
        self.state().tokens.is_current(token)
    }

    pub(crate) fn is_accessible(&self, instance_id: i64) -> bool {
        self.state().accessible.contains(&instance_id)
    }

    /// Records an error on behalf of a pass, unless the pass is stale
    pub(crate) fn record_pass_error(
        &self,
        token: LoopToken,
        error: MonitorError,
        instance_id: Option<i64>,
        job_id: Option<i64>,
    ) {
        let mut state = self.state();
        if state.tokens.is_current(token) {
            state.errors.record(&error, instance_id, job_id);
        } else {
            debug!("Dropping error from stale pass: {}", error);
        }
    }

    pub(crate) fn notify_refreshed(&self) {
        // No subscribers is fine
        let _ = self.shared.events.send(MonitorEvent::JobsRefreshed);
    }
}
