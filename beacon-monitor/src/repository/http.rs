//! HTTP implementation of ServerRepository

use async_trait::async_trait;
use beacon_client::{Result, ServerClient};
use beacon_core::domain::instance::Instance;
use beacon_core::domain::job::Job;
use beacon_core::domain::user::{InstancePermissionSet, UserProfile};
use std::sync::Arc;

use super::ServerRepository;

/// Repository backed by the HTTP client
pub struct HttpServerRepository {
    client: Arc<ServerClient>,
}

impl HttpServerRepository {
    /// Creates a new HTTP server repository
    ///
    /// # Arguments
    /// * `client` - Shared client configured with the server URL and credentials
    pub fn new(client: Arc<ServerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ServerRepository for HttpServerRepository {
    async fn list_instances(&self) -> Result<Vec<Instance>> {
        self.client.list_instances().await
    }

    async fn get_current_user(&self) -> Result<UserProfile> {
        self.client.get_current_user().await
    }

    async fn get_current_permission_set(&self, instance_id: i64) -> Result<InstancePermissionSet> {
        self.client.get_current_permission_set(instance_id).await
    }

    async fn list_active_jobs(&self, instance_id: i64) -> Result<Vec<Job>> {
        self.client.list_active_jobs(instance_id).await
    }

    async fn get_job(&self, instance_id: i64, job_id: i64) -> Result<Job> {
        self.client.get_job(instance_id, job_id).await
    }

    async fn delete_job(&self, instance_id: i64, job_id: i64) -> Result<()> {
        self.client.delete_job(instance_id, job_id).await
    }
}
