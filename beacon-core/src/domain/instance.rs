//! Instance domain model

use serde::{Deserialize, Serialize};

/// An independently managed server instance that hosts jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Whether the instance is currently attached and serving requests
    #[serde(default)]
    pub online: bool,
}
