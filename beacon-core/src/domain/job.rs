//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rights::{RequiredRight, RightsScope, UnknownRightsType};

/// A long-running server task owned by one instance
///
/// Created locally the first time it is seen in an active-jobs listing or a
/// single job fetch, then updated in place as new records arrive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    #[serde(default)]
    pub instance_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub started_by: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Absent while the job is still running
    #[serde(default)]
    pub stopped_at: Option<DateTime<Utc>>,
    /// Completion percentage, when the server reports one
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub cancelled: Option<bool>,
    #[serde(default)]
    pub cancel_right: Option<u64>,
    /// Raw rights type tag, decoded by [`Job::required_right`]
    #[serde(default)]
    pub cancel_rights_type: Option<u8>,

    /// Cached cancel decision for the current user. Local only.
    #[serde(skip)]
    pub can_cancel: Option<bool>,
}

impl Job {
    pub fn new(id: i64, instance_id: i64) -> Self {
        Self {
            id,
            instance_id,
            description: None,
            started_by: None,
            started_at: None,
            stopped_at: None,
            progress: None,
            stage: None,
            error_message: None,
            cancelled: None,
            cancel_right: None,
            cancel_rights_type: None,
            can_cancel: None,
        }
    }

    /// A job is terminal once the server has stamped a stop time
    pub fn is_terminal(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Decodes the right required to cancel this job
    ///
    /// Returns `Ok(None)` when the job declares no rights type, meaning
    /// anyone who can see the job may cancel it.
    pub fn required_right(&self) -> Result<Option<RequiredRight>, UnknownRightsType> {
        let Some(tag) = self.cancel_rights_type else {
            return Ok(None);
        };
        let scope = RightsScope::try_from(tag)?;
        Ok(Some(RequiredRight {
            scope,
            mask: self.cancel_right.unwrap_or(0),
        }))
    }

    /// Applies a fresher server record on top of this one
    ///
    /// Fields present on `incoming` overwrite local values, absent optional
    /// fields keep what we already had. Server records never carry a cancel
    /// decision, so a cached one is kept until the job leaves the table.
    pub fn merge_from(&mut self, incoming: Job) {
        self.instance_id = incoming.instance_id;
        merge_field(&mut self.description, incoming.description);
        merge_field(&mut self.started_by, incoming.started_by);
        merge_field(&mut self.started_at, incoming.started_at);
        merge_field(&mut self.stopped_at, incoming.stopped_at);
        merge_field(&mut self.progress, incoming.progress);
        merge_field(&mut self.stage, incoming.stage);
        merge_field(&mut self.error_message, incoming.error_message);
        merge_field(&mut self.cancelled, incoming.cancelled);
        merge_field(&mut self.cancel_right, incoming.cancel_right);
        merge_field(&mut self.cancel_rights_type, incoming.cancel_rights_type);
        merge_field(&mut self.can_cancel, incoming.can_cancel);
    }
}

fn merge_field<T>(current: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *current = incoming;
    }
}
