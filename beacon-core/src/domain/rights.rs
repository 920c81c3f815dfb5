//! Right scopes
//!
//! Jobs declare the right a user needs to cancel them as a pair of a scope
//! tag and a bitmask. The scope decides which permission object holds the
//! user's mask: the global user profile or the instance permission set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scopes whose masks live on the user's global permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalScope {
    Administration,
    InstanceManager,
}

/// Scopes whose masks live on the user's per-instance permission set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceScope {
    Repository,
    Byond,
    DreamMaker,
    DreamDaemon,
    ChatBots,
    Configuration,
    InstancePermissionSet,
}

/// Decoded rights type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RightsScope {
    Global(GlobalScope),
    Instance(InstanceScope),
}

/// Raised when a job carries a rights type tag outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown rights type tag: {0}")]
pub struct UnknownRightsType(pub u8);

impl TryFrom<u8> for RightsScope {
    type Error = UnknownRightsType;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        let scope = match tag {
            0 => RightsScope::Global(GlobalScope::Administration),
            1 => RightsScope::Global(GlobalScope::InstanceManager),
            2 => RightsScope::Instance(InstanceScope::Repository),
            3 => RightsScope::Instance(InstanceScope::Byond),
            4 => RightsScope::Instance(InstanceScope::DreamMaker),
            5 => RightsScope::Instance(InstanceScope::DreamDaemon),
            6 => RightsScope::Instance(InstanceScope::ChatBots),
            7 => RightsScope::Instance(InstanceScope::Configuration),
            8 => RightsScope::Instance(InstanceScope::InstancePermissionSet),
            other => return Err(UnknownRightsType(other)),
        };
        Ok(scope)
    }
}

impl std::fmt::Display for RightsScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RightsScope::Global(scope) => write!(f, "{:?}", scope),
            RightsScope::Instance(scope) => write!(f, "{:?}", scope),
        }
    }
}

/// The right a user must hold to cancel a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRight {
    pub scope: RightsScope,
    pub mask: u64,
}

impl RequiredRight {
    /// Returns true if `held` intersects the required mask
    pub fn is_granted_by(&self, held: u64) -> bool {
        held & self.mask != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_decode() {
        let scopes: Vec<RightsScope> = (0u8..=8)
            .map(|tag| RightsScope::try_from(tag).unwrap())
            .collect();
        assert_eq!(scopes[0], RightsScope::Global(GlobalScope::Administration));
        assert_eq!(scopes[1], RightsScope::Global(GlobalScope::InstanceManager));
        assert_eq!(scopes[4], RightsScope::Instance(InstanceScope::DreamMaker));
        assert_eq!(
            scopes[8],
            RightsScope::Instance(InstanceScope::InstancePermissionSet)
        );
        // Every tag maps to a distinct scope
        for (i, a) in scopes.iter().enumerate() {
            assert!(scopes[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(RightsScope::try_from(9), Err(UnknownRightsType(9)));
        assert_eq!(RightsScope::try_from(255), Err(UnknownRightsType(255)));
    }

    #[test]
    fn test_required_right_intersection() {
        let right = RequiredRight {
            scope: RightsScope::Instance(InstanceScope::Repository),
            mask: 0b0100,
        };
        assert!(right.is_granted_by(0b0110));
        assert!(!right.is_granted_by(0b1011));
        assert!(!right.is_granted_by(0));
    }
}
