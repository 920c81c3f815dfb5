//! User-related API endpoints

use crate::ServerClient;
use crate::error::Result;
use beacon_core::domain::user::UserProfile;

impl ServerClient {
    /// Get the profile of the authenticated user, including global rights
    pub async fn get_current_user(&self) -> Result<UserProfile> {
        let url = format!("{}/api/users/current", self.base_url);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }
}
