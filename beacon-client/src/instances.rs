//! Instance-related API endpoints

use crate::ServerClient;
use crate::error::Result;
use beacon_core::domain::instance::Instance;
use beacon_core::domain::user::InstancePermissionSet;

impl ServerClient {
    /// List every instance known to the server
    ///
    /// # Returns
    /// All instances, online or not
    pub async fn list_instances(&self) -> Result<Vec<Instance>> {
        let url = format!("{}/api/instances", self.base_url);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the current user's permission set on an instance
    ///
    /// Fails with [`ClientError::AccessDenied`](crate::ClientError::AccessDenied)
    /// when the user has no visibility of the instance.
    ///
    /// # Arguments
    /// * `instance_id` - The instance ID
    pub async fn get_current_permission_set(
        &self,
        instance_id: i64,
    ) -> Result<InstancePermissionSet> {
        let url = format!(
            "{}/api/instances/{}/permissions/current",
            self.base_url, instance_id
        );
        let response = self.get(&url).send().await?;

        let mut set: InstancePermissionSet = self.handle_response(response).await?;
        set.instance_id = instance_id;
        Ok(set)
    }
}
