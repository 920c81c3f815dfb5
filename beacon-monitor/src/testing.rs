//! In-memory server for controller tests

use async_trait::async_trait;
use beacon_client::{ClientError, Result};
use beacon_core::domain::instance::Instance;
use beacon_core::domain::job::Job;
use beacon_core::domain::user::{InstancePermissionSet, UserProfile};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::repository::ServerRepository;

#[derive(Default)]
struct FakeState {
    instances: BTreeMap<i64, Instance>,
    permission_sets: BTreeMap<i64, InstancePermissionSet>,
    denied: BTreeSet<i64>,
    broken_permissions: BTreeSet<i64>,
    user: Option<UserProfile>,
    active: BTreeMap<i64, Vec<Job>>,
    jobs: BTreeMap<i64, Job>,
    offline: BTreeSet<i64>,
    failing_lists: BTreeSet<i64>,
    offline_lookups: BTreeSet<i64>,
    failing_lookups: BTreeSet<i64>,
    fail_instances: bool,
    fail_delete: bool,
    calls: Vec<String>,
}

/// Scriptable stand-in for the server
#[derive(Default)]
pub struct FakeServer {
    state: Mutex<FakeState>,
    list_gate: Mutex<Option<Arc<Notify>>>,
    instances_gate: Mutex<Option<Arc<Notify>>>,
    panic_next_list: AtomicBool,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance the user can see
    pub fn with_instance(self, id: i64, online: bool) -> Self {
        {
            let mut state = self.lock();
            state.instances.insert(
                id,
                Instance {
                    id,
                    name: Some(format!("instance-{}", id)),
                    path: None,
                    online,
                },
            );
            state.permission_sets.entry(id).or_insert(InstancePermissionSet {
                instance_id: id,
                ..Default::default()
            });
        }
        self
    }

    pub fn with_permission_set(self, id: i64, set: InstancePermissionSet) -> Self {
        self.lock().permission_sets.insert(id, set);
        self
    }

    pub fn with_user(self, user: UserProfile) -> Self {
        self.lock().user = Some(user);
        self
    }

    pub fn deny(self, id: i64) -> Self {
        self.lock().denied.insert(id);
        self
    }

    pub fn break_permissions(self, id: i64) -> Self {
        self.lock().broken_permissions.insert(id);
        self
    }

    /// Replaces the active list of an instance and stores each job for lookup
    pub fn set_active(&self, instance_id: i64, jobs: Vec<Job>) {
        let mut state = self.lock();
        for job in &jobs {
            state.jobs.insert(job.id, job.clone());
        }
        state.active.insert(instance_id, jobs);
    }

    /// Stores a job for lookup without listing it as active
    pub fn put_job(&self, job: Job) {
        self.lock().jobs.insert(job.id, job);
    }

    /// Removes a job so lookups fail with not found
    pub fn forget_job(&self, job_id: i64) {
        self.lock().jobs.remove(&job_id);
    }

    /// Marks an instance offline: job calls fail and it is listed offline
    pub fn take_offline(&self, instance_id: i64) {
        let mut state = self.lock();
        state.offline.insert(instance_id);
        if let Some(instance) = state.instances.get_mut(&instance_id) {
            instance.online = false;
        }
    }

    pub fn fail_list(&self, instance_id: i64, fail: bool) {
        let mut state = self.lock();
        if fail {
            state.failing_lists.insert(instance_id);
        } else {
            state.failing_lists.remove(&instance_id);
        }
    }

    /// Makes single job lookups on an instance report it offline while its
    /// active list still answers
    pub fn take_job_lookups_offline(&self, instance_id: i64) {
        self.lock().offline_lookups.insert(instance_id);
    }

    /// Makes single job lookups on an instance fail with a server error
    pub fn fail_job_lookups(&self, instance_id: i64) {
        self.lock().failing_lookups.insert(instance_id);
    }

    /// Makes the next `list_active_jobs` call panic
    pub fn panic_next_list(&self) {
        self.panic_next_list.store(true, Ordering::SeqCst);
    }

    pub fn fail_instances(&self, fail: bool) {
        self.lock().fail_instances = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.lock().fail_delete = fail;
    }

    /// Holds the next `list_active_jobs` call after it has read its data,
    /// until the returned gate is notified
    pub fn gate_next_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.list_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Holds the next `list_instances` call after it has read its data,
    /// until the returned gate is notified
    pub fn gate_next_instances(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.instances_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: String) {
        self.lock().calls.push(call);
    }
}

fn offline(instance_id: i64) -> ClientError {
    ClientError::InstanceOffline(format!("instance {} is offline", instance_id))
}

#[async_trait]
impl ServerRepository for FakeServer {
    async fn list_instances(&self) -> Result<Vec<Instance>> {
        self.record("list_instances".to_string());
        let result = {
            let state = self.lock();
            if state.fail_instances {
                Err(ClientError::api_error(503, "unavailable"))
            } else {
                Ok(state.instances.values().cloned().collect())
            }
        };

        let gate = self.instances_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }

    async fn get_current_user(&self) -> Result<UserProfile> {
        self.record("get_current_user".to_string());
        self.lock()
            .user
            .clone()
            .ok_or_else(|| ClientError::api_error(500, "user lookup failed"))
    }

    async fn get_current_permission_set(&self, instance_id: i64) -> Result<InstancePermissionSet> {
        self.record(format!("get_current_permission_set:{}", instance_id));
        let state = self.lock();
        if state.denied.contains(&instance_id) {
            return Err(ClientError::AccessDenied("forbidden".to_string()));
        }
        if state.broken_permissions.contains(&instance_id) {
            return Err(ClientError::api_error(500, "permission lookup failed"));
        }
        state
            .permission_sets
            .get(&instance_id)
            .copied()
            .ok_or_else(|| ClientError::NotFound(format!("instance {}", instance_id)))
    }

    async fn list_active_jobs(&self, instance_id: i64) -> Result<Vec<Job>> {
        self.record(format!("list_active_jobs:{}", instance_id));
        if self.panic_next_list.swap(false, Ordering::SeqCst) {
            panic!("list_active_jobs exploded");
        }
        let result = {
            let state = self.lock();
            if state.offline.contains(&instance_id) {
                Err(offline(instance_id))
            } else if state.failing_lists.contains(&instance_id) {
                Err(ClientError::api_error(500, "list failed"))
            } else {
                Ok(state.active.get(&instance_id).cloned().unwrap_or_default())
            }
        };

        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }

    async fn get_job(&self, instance_id: i64, job_id: i64) -> Result<Job> {
        self.record(format!("get_job:{}:{}", instance_id, job_id));
        let state = self.lock();
        if state.offline.contains(&instance_id) || state.offline_lookups.contains(&instance_id) {
            return Err(offline(instance_id));
        }
        if state.failing_lookups.contains(&instance_id) {
            return Err(ClientError::api_error(500, "job lookup failed"));
        }
        state
            .jobs
            .get(&job_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("job {}", job_id)))
    }

    async fn delete_job(&self, instance_id: i64, job_id: i64) -> Result<()> {
        self.record(format!("delete_job:{}:{}", instance_id, job_id));
        if self.lock().fail_delete {
            return Err(ClientError::api_error(409, "job cannot be cancelled"));
        }
        Ok(())
    }
}

/// Lets spawned tasks on the current-thread runtime run until they block
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

/// A running job that already reports progress
pub fn running_job(id: i64, instance_id: i64) -> Job {
    let mut job = Job::new(id, instance_id);
    job.started_at = Some(chrono::Utc::now());
    job.progress = Some(0);
    job
}

/// A job the server has already stopped
pub fn stopped_job(id: i64, instance_id: i64) -> Job {
    let mut job = running_job(id, instance_id);
    job.progress = Some(100);
    job.stopped_at = Some(chrono::Utc::now());
    job
}

pub fn monitor_for(server: &Arc<FakeServer>) -> crate::JobMonitor {
    monitor_with(server, crate::MonitorConfig::default())
}

pub fn monitor_with(server: &Arc<FakeServer>, config: crate::MonitorConfig) -> crate::JobMonitor {
    let repository: Arc<dyn ServerRepository> = server.clone();
    crate::JobMonitor::new(config, repository)
}
