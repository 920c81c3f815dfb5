//! Job table
//!
//! One primary store keyed by job ID plus a secondary index from instance
//! ID to the IDs of the jobs it owns. Records are never duplicated; the
//! index only holds keys into the primary store.

use beacon_core::domain::job::Job;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
pub struct JobTable {
    jobs: BTreeMap<i64, Job>,
    by_instance: BTreeMap<i64, BTreeSet<i64>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new job or merges it into the existing record
    pub fn upsert(&mut self, incoming: Job) {
        let id = incoming.id;
        let instance_id = incoming.instance_id;

        match self.jobs.get_mut(&id) {
            Some(existing) => {
                let previous_instance = existing.instance_id;
                existing.merge_from(incoming);
                if previous_instance != instance_id {
                    self.unindex(previous_instance, id);
                }
            }
            None => {
                self.jobs.insert(id, incoming);
            }
        }

        self.by_instance.entry(instance_id).or_default().insert(id);
    }

    /// Removes a job from both the store and the index
    pub fn remove(&mut self, id: i64) -> Option<Job> {
        let job = self.jobs.remove(&id)?;
        self.unindex(job.instance_id, id);
        Some(job)
    }

    pub fn get(&self, id: i64) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Stores a cancel decision on a job that is still in the table
    pub fn set_can_cancel(&mut self, id: i64, can_cancel: bool) {
        if let Some(job) = self.jobs.get_mut(&id) {
            job.can_cancel = Some(can_cancel);
        }
    }

    /// IDs of jobs on `instance_id` that have not stopped yet
    pub fn running_ids_for_instance(&self, instance_id: i64) -> BTreeSet<i64> {
        self.by_instance
            .get(&instance_id)
            .into_iter()
            .flatten()
            .copied()
            .filter(|id| self.jobs.get(id).is_some_and(|job| !job.is_terminal()))
            .collect()
    }

    pub fn jobs_for_instance(&self, instance_id: i64) -> Vec<Job> {
        self.by_instance
            .get(&instance_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.jobs.get(id).cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
        self.by_instance.clear();
    }

    fn unindex(&mut self, instance_id: i64, id: i64) {
        if let Some(ids) = self.by_instance.get_mut(&instance_id) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_instance.remove(&instance_id);
            }
        }
    }

    /// Every indexed job exists in the store under its own instance, and
    /// every stored job is indexed exactly once.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let indexed: usize = self.by_instance.values().map(BTreeSet::len).sum();
        indexed == self.jobs.len()
            && self.by_instance.iter().all(|(instance_id, ids)| {
                ids.iter().all(|id| {
                    self.jobs
                        .get(id)
                        .is_some_and(|job| job.instance_id == *instance_id)
                })
            })
    }
}
