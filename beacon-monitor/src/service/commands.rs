//! Command surface

use tracing::info;

use crate::error::MonitorError;
use crate::monitor::JobMonitor;

impl JobMonitor {
    /// Cancels a running job or clears a finished one
    ///
    /// - Unknown job: nothing happens, returns `Ok(false)`.
    /// - Finished job: removed locally without contacting the server.
    /// - Running job: a cancel request is sent. The job stays in the table
    ///   until a later pass observes it stopping.
    ///
    /// # Errors
    /// Returns the server error if the cancel request fails.
    pub async fn cancel_or_clear(&self, job_id: i64) -> Result<bool, MonitorError> {
        let instance_id = {
            let mut state = self.state();
            let (instance_id, terminal) = match state.table.get(job_id) {
                Some(job) => (job.instance_id, job.is_terminal()),
                None => return Ok(false),
            };

            if terminal {
                state.table.remove(job_id);
                drop(state);
                info!("Cleared finished job {}", job_id);
                self.notify_refreshed();
                return Ok(true);
            }
            instance_id
        };

        self.repository()
            .delete_job(instance_id, job_id)
            .await
            .map_err(|e| MonitorError::client(format!("Failed to cancel job {}", job_id), e))?;

        info!("Cancellation requested for job {} on instance {}", job_id, instance_id);
        Ok(true)
    }
}
