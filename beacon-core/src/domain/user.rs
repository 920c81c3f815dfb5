//! User profile and permission sets

use serde::{Deserialize, Serialize};

use super::rights::{GlobalScope, InstanceScope};

/// The authenticated user as returned by the current-user endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub permission_set: GlobalPermissionSet,
}

/// Server-wide rights held by a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPermissionSet {
    #[serde(default)]
    pub administration_rights: u64,
    #[serde(default)]
    pub instance_manager_rights: u64,
}

impl GlobalPermissionSet {
    pub fn rights_for(&self, scope: GlobalScope) -> u64 {
        match scope {
            GlobalScope::Administration => self.administration_rights,
            GlobalScope::InstanceManager => self.instance_manager_rights,
        }
    }
}

/// Rights a user holds on one instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePermissionSet {
    #[serde(default)]
    pub instance_id: i64,
    #[serde(default)]
    pub byond_rights: u64,
    #[serde(default)]
    pub chat_bot_rights: u64,
    #[serde(default)]
    pub configuration_rights: u64,
    #[serde(default)]
    pub dream_daemon_rights: u64,
    #[serde(default)]
    pub dream_maker_rights: u64,
    #[serde(default)]
    pub instance_permission_set_rights: u64,
    #[serde(default)]
    pub repository_rights: u64,
}

impl InstancePermissionSet {
    pub fn rights_for(&self, scope: InstanceScope) -> u64 {
        match scope {
            InstanceScope::Byond => self.byond_rights,
            InstanceScope::ChatBots => self.chat_bot_rights,
            InstanceScope::Configuration => self.configuration_rights,
            InstanceScope::DreamDaemon => self.dream_daemon_rights,
            InstanceScope::DreamMaker => self.dream_maker_rights,
            InstanceScope::InstancePermissionSet => self.instance_permission_set_rights,
            InstanceScope::Repository => self.repository_rights,
        }
    }
}
