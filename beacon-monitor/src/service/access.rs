//! Accessibility tracker
//!
//! Maintains the set of instances the current user may query. The set is
//! rebuilt wholesale on every refresh; the only incremental change is the
//! eviction of an instance found offline during a pass.

use futures::future::join_all;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::MonitorError;
use crate::monitor::JobMonitor;

impl JobMonitor {
    /// Rebuilds the accessible instance set
    ///
    /// With `reschedule` set, also (re)starts the background probe that
    /// repeats the refresh every `instance_probe_interval`.
    pub async fn refresh_accessible_instances(&self, reschedule: bool) {
        self.probe_accessible_instances().await;

        if reschedule {
            self.spawn_instance_probe();
        }
    }

    pub(crate) async fn probe_accessible_instances(&self) {
        let instances = match self.repository().list_instances().await {
            Ok(instances) => instances,
            Err(e) => {
                self.state().errors.record(
                    &MonitorError::client("Failed to list instances", e),
                    None,
                    None,
                );
                return;
            }
        };

        let online: Vec<i64> = instances
            .into_iter()
            .filter(|instance| instance.online)
            .map(|instance| instance.id)
            .collect();

        let checks = online.iter().map(|&instance_id| async move {
            let result = self
                .repository()
                .get_current_permission_set(instance_id)
                .await;
            (instance_id, result)
        });
        let results = join_all(checks).await;

        let mut state = self.state();
        let mut candidates = BTreeSet::new();
        for (instance_id, result) in results {
            match result {
                Ok(_) => {
                    candidates.insert(instance_id);
                }
                Err(e) if e.is_access_denied() => {
                    debug!("No access to instance {}, skipping", instance_id);
                }
                Err(e) => {
                    state.errors.record(
                        &MonitorError::client("Failed to fetch instance permission set", e),
                        Some(instance_id),
                        None,
                    );
                }
            }
        }

        if state.accessible != candidates {
            info!(
                "Accessible instances changed: {:?} -> {:?}",
                state.accessible, candidates
            );
        }
        state.accessible = candidates;
    }

    /// Drops an instance that reported itself offline and schedules a
    /// refresh to pick up the new topology
    pub(crate) fn evict_instance(&self, instance_id: i64) {
        let removed = self.state().accessible.remove(&instance_id);
        if removed {
            info!("Instance {} went offline, evicting", instance_id);
        }

        let monitor = self.clone();
        tokio::spawn(async move {
            monitor.probe_accessible_instances().await;
        });
    }

    fn spawn_instance_probe(&self) {
        let monitor = self.clone();
        let interval = self.config().instance_probe_interval;

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                debug!("Probing accessible instances");
                monitor.probe_accessible_instances().await;
            }
        });

        if let Some(previous) = self.state().probe_task.replace(handle) {
            previous.abort();
        }
    }
}
