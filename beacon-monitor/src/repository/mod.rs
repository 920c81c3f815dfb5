//! Repository layer
//!
//! Repositories abstract communication with the server. The monitor only
//! talks to the server through [`ServerRepository`], which keeps the
//! reconciliation logic testable against in-memory fakes.

mod http;

pub use http::HttpServerRepository;

use async_trait::async_trait;
use beacon_client::Result;
use beacon_core::domain::instance::Instance;
use beacon_core::domain::job::Job;
use beacon_core::domain::user::{InstancePermissionSet, UserProfile};

/// Server operations the monitor depends on
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// Lists every instance with its online flag
    async fn list_instances(&self) -> Result<Vec<Instance>>;

    /// Fetches the current user's profile and global rights
    async fn get_current_user(&self) -> Result<UserProfile>;

    /// Fetches the current user's rights on one instance
    ///
    /// Fails with an access-denied error when the user cannot see the instance.
    async fn get_current_permission_set(&self, instance_id: i64) -> Result<InstancePermissionSet>;

    /// Lists the running jobs of one instance
    ///
    /// Fails with an instance-offline error if the instance went away.
    async fn list_active_jobs(&self, instance_id: i64) -> Result<Vec<Job>>;

    /// Fetches one job, running or not
    async fn get_job(&self, instance_id: i64, job_id: i64) -> Result<Job>;

    /// Requests cancellation of a running job
    async fn delete_job(&self, instance_id: i64, job_id: i64) -> Result<()>;
}
