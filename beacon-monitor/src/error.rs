//! Error types and the pass-scoped error log

use beacon_client::ClientError;
use beacon_core::domain::rights::UnknownRightsType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by monitor operations
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A collaborator call failed
    #[error("{context}: {source}")]
    Client {
        context: String,
        #[source]
        source: ClientError,
    },

    /// A job declared a rights type outside the known set
    #[error(transparent)]
    UnknownRightsType(#[from] UnknownRightsType),

    /// A pass failed in an unexpected way
    #[error("reconciliation pass panicked: {0}")]
    TaskPanicked(String),
}

impl MonitorError {
    pub fn client(context: impl Into<String>, source: ClientError) -> Self {
        Self::Client {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client { source, .. } if source.is_access_denied() => ErrorKind::AccessDenied,
            Self::Client { source, .. } if source.is_instance_offline() => {
                ErrorKind::InstanceOffline
            }
            Self::Client { .. } => ErrorKind::Transport,
            Self::UnknownRightsType(_) => ErrorKind::Authorization,
            Self::TaskPanicked(_) => ErrorKind::Internal,
        }
    }
}

/// Coarse classification of a logged error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Transport,
    AccessDenied,
    InstanceOffline,
    Authorization,
    Internal,
}

/// One entry in the error log
#[derive(Debug, Clone, Serialize)]
pub struct LoggedError {
    pub at: DateTime<Utc>,
    pub instance_id: Option<i64>,
    pub job_id: Option<i64>,
    pub kind: ErrorKind,
    pub message: String,
}

/// Errors recorded during the most recent reconciliation pass
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: Vec<LoggedError>,
}

impl ErrorLog {
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn record(&mut self, error: &MonitorError, instance_id: Option<i64>, job_id: Option<i64>) {
        tracing::warn!(
            instance_id = ?instance_id,
            job_id = ?job_id,
            "{}",
            error
        );
        self.entries.push(LoggedError {
            at: Utc::now(),
            instance_id,
            job_id,
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn entries(&self) -> &[LoggedError] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
