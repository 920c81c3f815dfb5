//! Error body DTO

use serde::{Deserialize, Serialize};

/// Server error code reported when an instance is detached or offline.
pub const INSTANCE_OFFLINE_ERROR_CODE: u32 = 83;

/// Error body returned by the API on non-success status codes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<u32>,
    #[serde(default)]
    pub additional_data: Option<String>,
}

impl ErrorMessage {
    /// Parses an error body, falling back to using the raw text as the message
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: (!body.trim().is_empty()).then(|| body.trim().to_string()),
            ..Self::default()
        })
    }

    pub fn is_instance_offline(&self) -> bool {
        self.error_code == Some(INSTANCE_OFFLINE_ERROR_CODE)
    }
}
