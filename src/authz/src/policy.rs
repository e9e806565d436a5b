//! Permission policy contract
//!
//! The policy collaborator answers the `authorize()` question for a
//! principal whose existence the realm already confirmed.

use crate::realm::RawAttributes;
use async_trait::async_trait;

/// Authorization decision contract
#[async_trait]
pub trait PermissionPolicy: Send + Sync {
    /// Decide whether the principal may proceed
    async fn decide(&self, principal: &str, attributes: &RawAttributes) -> bool;
}

/// Policy permitting every confirmed principal
#[derive(Debug, Clone, Copy, Default)]
pub struct PermitAll;

#[async_trait]
impl PermissionPolicy for PermitAll {
    async fn decide(&self, _principal: &str, _attributes: &RawAttributes) -> bool {
        true
    }
}

/// Policy denying every principal
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

#[async_trait]
impl PermissionPolicy for DenyAll {
    async fn decide(&self, _principal: &str, _attributes: &RawAttributes) -> bool {
        false
    }
}

/// Policy requiring a named raw role to be present
///
/// Decides on the realm's raw attributes, before any role mapping runs.
#[derive(Debug, Clone)]
pub struct RequireRawRole {
    role: String,
}

impl RequireRawRole {
    /// Require the given raw role
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

#[async_trait]
impl PermissionPolicy for RequireRawRole {
    async fn decide(&self, _principal: &str, attributes: &RawAttributes) -> bool {
        attributes.roles().contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realm::ROLES_ATTRIBUTE;

    #[tokio::test]
    async fn test_permit_and_deny_all() {
        let attributes = RawAttributes::new();
        assert!(PermitAll.decide("john", &attributes).await);
        assert!(!DenyAll.decide("john", &attributes).await);
    }

    #[tokio::test]
    async fn test_require_raw_role() {
        let policy = RequireRawRole::new("operator");

        let with_role = RawAttributes::new().with_attribute(ROLES_ATTRIBUTE, ["operator"]);
        let without = RawAttributes::new().with_attribute(ROLES_ATTRIBUTE, ["user"]);

        assert!(policy.decide("john", &with_role).await);
        assert!(!policy.decide("john", &without).await);
    }
}
