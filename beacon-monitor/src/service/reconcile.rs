//! Reconciliation engine
//!
//! One pass polls every accessible instance concurrently, merges the active
//! jobs it reports, re-fetches jobs that dropped out of the active list,
//! then fills in missing progress and cancel decisions for every known job.
//!
//! The pass checks its loop token after each suspension point and stops
//! mutating shared state as soon as the token is stale. Requests already
//! in flight are left to complete and their results are discarded.

use beacon_core::domain::job::Job;
use futures::future::join_all;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::MonitorError;
use crate::monitor::JobMonitor;
use crate::scheduler::LoopToken;

/// How a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// A newer loop generation took over; nothing was published
    Stale,
    /// The pass finished and notified observers
    Completed { any_active: bool },
}

impl JobMonitor {
    /// Runs one reconciliation pass under `token`
    pub(crate) async fn reconcile(&self, token: LoopToken) -> PassOutcome {
        let instances: Vec<i64> = {
            let mut state = self.state();
            if !state.tokens.is_current(token) {
                return PassOutcome::Stale;
            }
            state.errors.clear();
            state.accessible.iter().copied().collect()
        };

        debug!(
            "Pass {} polling {} instance(s)",
            token.generation(),
            instances.len()
        );

        let active_counts = join_all(
            instances
                .iter()
                .map(|&instance_id| self.poll_instance(token, instance_id)),
        )
        .await;
        let active_jobs: usize = active_counts.into_iter().sum();

        let known: Vec<Job> = {
            let state = self.state();
            if !state.tokens.is_current(token) {
                return PassOutcome::Stale;
            }
            state.table.iter().cloned().collect()
        };

        join_all(known.into_iter().map(|job| self.refresh_job(token, job))).await;

        if !self.is_current(token) {
            return PassOutcome::Stale;
        }

        debug!(
            "Pass {} complete: {} active job(s), {} error(s)",
            token.generation(),
            active_jobs,
            self.state().errors.len()
        );
        self.notify_refreshed();

        PassOutcome::Completed {
            any_active: active_jobs > 0,
        }
    }

    /// Polls one instance and returns how many active jobs it reported
    async fn poll_instance(&self, token: LoopToken, instance_id: i64) -> usize {
        let active = match self.repository().list_active_jobs(instance_id).await {
            Ok(jobs) => jobs,
            Err(e) if e.is_instance_offline() => {
                if self.is_current(token) {
                    self.evict_instance(instance_id);
                }
                return 0;
            }
            Err(e) => {
                self.record_pass_error(
                    token,
                    MonitorError::client("Failed to list active jobs", e),
                    Some(instance_id),
                    None,
                );
                return 0;
            }
        };

        let active_count = active.len();
        let vanished: Vec<i64> = {
            let mut state = self.state();
            if !state.tokens.is_current(token) {
                return 0;
            }

            let previously_running = state.table.running_ids_for_instance(instance_id);
            let reported: BTreeSet<i64> = active.iter().map(|job| job.id).collect();

            for mut job in active {
                job.instance_id = instance_id;
                state.table.upsert(job);
            }

            previously_running
                .difference(&reported)
                .copied()
                .collect()
        };

        if !vanished.is_empty() {
            debug!(
                "Instance {}: {} job(s) left the active list, re-fetching",
                instance_id,
                vanished.len()
            );
            join_all(
                vanished
                    .iter()
                    .map(|&job_id| self.fetch_job(token, instance_id, job_id)),
            )
            .await;
        }

        if !self.is_current(token) {
            return 0;
        }
        active_count
    }

    /// Fetches a job that is no longer listed as active
    async fn fetch_job(&self, token: LoopToken, instance_id: i64, job_id: i64) {
        match self.repository().get_job(instance_id, job_id).await {
            Ok(job) => {
                let mut state = self.state();
                if state.tokens.is_current(token) {
                    if job.is_terminal() {
                        info!("Job {} on instance {} finished", job_id, instance_id);
                    }
                    state.table.upsert(job);
                }
            }
            Err(e) => self.record_pass_error(
                token,
                MonitorError::client(format!("Failed to fetch job {}", job_id), e),
                Some(instance_id),
                Some(job_id),
            ),
        }
    }

    /// Fills in progress and the cancel decision for one known job
    async fn refresh_job(&self, token: LoopToken, job: Job) {
        let progress = async {
            if job.progress.is_some() || job.is_terminal() || !self.is_accessible(job.instance_id)
            {
                return;
            }

            match self.repository().get_job(job.instance_id, job.id).await {
                Ok(fresh) => {
                    let mut state = self.state();
                    if state.tokens.is_current(token) {
                        state.table.upsert(fresh);
                    }
                }
                Err(e) if e.is_instance_offline() => {
                    if self.is_current(token) {
                        self.evict_instance(job.instance_id);
                    }
                }
                Err(e) => self.record_pass_error(
                    token,
                    MonitorError::client(format!("Failed to fetch job {}", job.id), e),
                    Some(job.instance_id),
                    Some(job.id),
                ),
            }
        };

        let authorization = async {
            let decision = self.resolve_can_cancel(token, &job).await;
            let mut state = self.state();
            if state.tokens.is_current(token) {
                state.table.set_can_cancel(job.id, decision);
            }
        };

        futures::join!(progress, authorization);
    }
}
