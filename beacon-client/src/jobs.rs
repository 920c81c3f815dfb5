//! Job-related API endpoints

use crate::ServerClient;
use crate::error::Result;
use beacon_core::domain::job::Job;

impl ServerClient {
    /// List the jobs currently running on an instance
    ///
    /// # Arguments
    /// * `instance_id` - The instance ID
    ///
    /// # Returns
    /// Active jobs, each stamped with `instance_id`
    ///
    /// # Example
    /// ```no_run
    /// # use beacon_client::ServerClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ServerClient::new("http://localhost:5000");
    /// for job in client.list_active_jobs(1).await? {
    ///     println!("{} {:?}", job.id, job.progress);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_active_jobs(&self, instance_id: i64) -> Result<Vec<Job>> {
        let url = format!("{}/api/instances/{}/jobs/active", self.base_url, instance_id);
        let response = self.get(&url).send().await?;

        let mut jobs: Vec<Job> = self.handle_response(response).await?;
        for job in &mut jobs {
            job.instance_id = instance_id;
        }
        Ok(jobs)
    }

    /// Get a single job by ID
    ///
    /// # Arguments
    /// * `instance_id` - The owning instance ID
    /// * `job_id` - The job ID
    pub async fn get_job(&self, instance_id: i64, job_id: i64) -> Result<Job> {
        let url = format!(
            "{}/api/instances/{}/jobs/{}",
            self.base_url, instance_id, job_id
        );
        let response = self.get(&url).send().await?;

        let mut job: Job = self.handle_response(response).await?;
        job.instance_id = instance_id;
        Ok(job)
    }

    /// Request cancellation of a running job
    ///
    /// # Arguments
    /// * `instance_id` - The owning instance ID
    /// * `job_id` - The job ID to cancel
    pub async fn delete_job(&self, instance_id: i64, job_id: i64) -> Result<()> {
        let url = format!(
            "{}/api/instances/{}/jobs/{}",
            self.base_url, instance_id, job_id
        );
        let response = self.authorized(self.client.delete(&url)).send().await?;

        self.handle_empty_response(response).await
    }
}
