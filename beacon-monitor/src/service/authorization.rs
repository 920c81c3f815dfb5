//! Authorization resolver
//!
//! Decides whether the current user may cancel a job. The job names a right
//! scope and a mask; the scope picks the permission object that holds the
//! user's mask for it, and the right is held if the two masks intersect.

use beacon_core::domain::job::Job;
use beacon_core::domain::rights::RightsScope;
use tracing::debug;

use crate::error::MonitorError;
use crate::monitor::JobMonitor;
use crate::repository::ServerRepository;
use crate::scheduler::LoopToken;

/// Resolves cancel permissions against the server
pub struct CancelAuthorizer<'a> {
    repository: &'a dyn ServerRepository,
}

impl<'a> CancelAuthorizer<'a> {
    pub fn new(repository: &'a dyn ServerRepository) -> Self {
        Self { repository }
    }

    /// Returns whether the current user may cancel `job`
    ///
    /// A cached decision on the job is returned as is. A job without a
    /// rights type can be cancelled by anyone who can see it.
    pub async fn can_cancel(&self, job: &Job) -> Result<bool, MonitorError> {
        if let Some(cached) = job.can_cancel {
            return Ok(cached);
        }

        let Some(required) = job.required_right()? else {
            return Ok(true);
        };

        let held = match required.scope {
            RightsScope::Global(scope) => {
                let user = self
                    .repository
                    .get_current_user()
                    .await
                    .map_err(|e| MonitorError::client("Failed to fetch current user", e))?;
                user.permission_set.rights_for(scope)
            }
            RightsScope::Instance(scope) => {
                let permissions = self
                    .repository
                    .get_current_permission_set(job.instance_id)
                    .await
                    .map_err(|e| {
                        MonitorError::client("Failed to fetch instance permission set", e)
                    })?;
                permissions.rights_for(scope)
            }
        };

        let granted = required.is_granted_by(held);
        debug!(
            "Job {} requires {} right {:#x}, user holds {:#x}: {}",
            job.id, required.scope, required.mask, held, granted
        );
        Ok(granted)
    }
}

impl JobMonitor {
    /// Resolves the cancel decision for a job, failing closed
    ///
    /// Any resolution error is recorded against the pass and yields `false`.
    pub(crate) async fn resolve_can_cancel(&self, token: LoopToken, job: &Job) -> bool {
        match CancelAuthorizer::new(self.repository()).can_cancel(job).await {
            Ok(decision) => decision,
            Err(e) => {
                self.record_pass_error(token, e, Some(job.instance_id), Some(job.id));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeServer;
    use beacon_core::domain::user::{GlobalPermissionSet, InstancePermissionSet, UserProfile};

    fn job_requiring(tag: u8, mask: u64) -> Job {
        let mut job = Job::new(1, 10);
        job.cancel_rights_type = Some(tag);
        job.cancel_right = Some(mask);
        job
    }

    #[tokio::test]
    async fn test_no_rights_type_is_cancellable() {
        let server = FakeServer::new();
        let authorizer = CancelAuthorizer::new(&server);

        assert!(authorizer.can_cancel(&Job::new(1, 10)).await.unwrap());
        assert!(server.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cached_decision_short_circuits() {
        let server = FakeServer::new();
        let authorizer = CancelAuthorizer::new(&server);

        let mut job = job_requiring(0, 1);
        job.can_cancel = Some(false);
        assert!(!authorizer.can_cancel(&job).await.unwrap());
        assert!(server.calls().is_empty());
    }

    #[tokio::test]
    async fn test_global_scope_uses_user_profile() {
        let server = FakeServer::new().with_user(UserProfile {
            id: 1,
            name: "admin".to_string(),
            enabled: true,
            permission_set: GlobalPermissionSet {
                administration_rights: 0b0010,
                instance_manager_rights: 0b1000,
            },
        });
        let authorizer = CancelAuthorizer::new(&server);

        // Administration
        assert!(authorizer.can_cancel(&job_requiring(0, 0b0010)).await.unwrap());
        assert!(!authorizer.can_cancel(&job_requiring(0, 0b0100)).await.unwrap());
        // InstanceManager
        assert!(authorizer.can_cancel(&job_requiring(1, 0b1000)).await.unwrap());
        assert_eq!(server.calls(), vec!["get_current_user"; 3]);
    }

    #[tokio::test]
    async fn test_instance_scope_uses_permission_set() {
        let server = FakeServer::new().with_permission_set(
            10,
            InstancePermissionSet {
                instance_id: 10,
                dream_maker_rights: 0b0001,
                repository_rights: 0b0100,
                ..Default::default()
            },
        );
        let authorizer = CancelAuthorizer::new(&server);

        // DreamMaker
        assert!(authorizer.can_cancel(&job_requiring(4, 0b0001)).await.unwrap());
        // Repository
        assert!(authorizer.can_cancel(&job_requiring(2, 0b0100)).await.unwrap());
        // Byond, nothing held
        assert!(!authorizer.can_cancel(&job_requiring(3, 0b0001)).await.unwrap());
        assert_eq!(
            server.calls(),
            vec!["get_current_permission_set:10"; 3]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_an_error() {
        let server = FakeServer::new();
        let authorizer = CancelAuthorizer::new(&server);

        let err = authorizer
            .can_cancel(&job_requiring(0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::Client { .. }));
    }

    #[tokio::test]
    async fn test_unknown_scope_is_an_error() {
        let server = FakeServer::new();
        let authorizer = CancelAuthorizer::new(&server);

        let err = authorizer
            .can_cancel(&job_requiring(99, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::UnknownRightsType(_)));
        assert!(server.calls().is_empty());
    }
}
