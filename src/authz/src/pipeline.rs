//! Staged authorization pipeline
//!
//! One authentication attempt walks a one-way state machine:
//!
//! ```text
//! Created -> NameSet -> ExistenceChecked -> Authorized -> Succeeded
//!               |               |
//!               v               v
//!       Failed(UnknownPrincipal)  Failed(AuthorizationDenied)
//! ```
//!
//! Out-of-order calls are programming errors and return
//! [`AuthzError::InvalidState`]; they never panic and never reorder.
//! A failed or finished attempt cannot be restarted; callers create a
//! fresh pipeline per attempt.

use crate::error::{AuthzError, Result};
use crate::mapper::RoleMappingStages;
use crate::policy::PermissionPolicy;
use crate::realm::{RawAttributes, RealmStore};
use crate::roles::RoleSet;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Terminal failure of an authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttemptFailure {
    /// The realm does not know the principal
    UnknownPrincipal,

    /// The permission policy denied the principal
    AuthorizationDenied,
}

/// State of one authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttemptState {
    /// Fresh pipeline, no principal bound
    Created,

    /// Candidate principal bound
    NameSet,

    /// Realm confirmed the principal exists
    ExistenceChecked,

    /// Permission policy granted access
    Authorized,

    /// Identity frozen and readable
    Succeeded,

    /// Attempt terminated without an identity
    Failed(AttemptFailure),
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::NameSet => f.write_str("name-set"),
            Self::ExistenceChecked => f.write_str("existence-checked"),
            Self::Authorized => f.write_str("authorized"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed(AttemptFailure::UnknownPrincipal) => {
                f.write_str("failed(unknown-principal)")
            }
            Self::Failed(AttemptFailure::AuthorizationDenied) => {
                f.write_str("failed(authorization-denied)")
            }
        }
    }
}

/// Authenticated identity, frozen at `succeed()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    principal: String,
    roles: RoleSet,
    attempt_id: Uuid,
}

impl Identity {
    /// The authenticated principal name
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// The effective roles
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Correlation id of the attempt that produced this identity
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }
}

/// One authentication attempt against a security domain
///
/// Holds the realm and policy collaborators plus the domain's role-mapping
/// stages; collaborator calls are awaited before the next transition.
pub struct AuthorizationPipeline {
    realm: Arc<dyn RealmStore>,
    policy: Arc<dyn PermissionPolicy>,
    stages: RoleMappingStages,
    state: AttemptState,
    attempt_id: Uuid,
    name: Option<String>,
    attributes: Option<RawAttributes>,
    identity: Option<Identity>,
}

impl AuthorizationPipeline {
    /// Create a fresh attempt with no role-mapping stages
    pub fn new(realm: Arc<dyn RealmStore>, policy: Arc<dyn PermissionPolicy>) -> Self {
        Self {
            realm,
            policy,
            stages: RoleMappingStages::new(),
            state: AttemptState::Created,
            attempt_id: Uuid::new_v4(),
            name: None,
            attributes: None,
            identity: None,
        }
    }

    /// Attach the domain's role-mapping stages
    pub fn with_stages(mut self, stages: RoleMappingStages) -> Self {
        self.stages = stages;
        self
    }

    /// Current attempt state
    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Bind the candidate principal name
    ///
    /// # Errors
    ///
    /// [`AuthzError::InvalidState`] unless the attempt is fresh;
    /// [`AuthzError::RealmFailure`] when the realm rejects the name as
    /// malformed.
    pub async fn set_authentication_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.expect(AttemptState::Created, "set_authentication_name")?;

        let name = name.into();
        self.realm.validate_name(&name).await?;

        debug!(attempt = %self.attempt_id, principal = %name, "authentication name set");
        self.name = Some(name);
        self.state = AttemptState::NameSet;
        Ok(())
    }

    /// Ask the realm whether the bound principal exists
    ///
    /// `false` terminates the attempt; it is an outcome, not an error.
    pub async fn exists(&mut self) -> Result<bool> {
        self.expect(AttemptState::NameSet, "exists")?;
        let name = self.bound_name()?;

        match self.realm.lookup(&name).await? {
            Some(attributes) => {
                debug!(attempt = %self.attempt_id, principal = %name, "principal exists");
                self.attributes = Some(attributes);
                self.state = AttemptState::ExistenceChecked;
                Ok(true)
            }
            None => {
                warn!(attempt = %self.attempt_id, principal = %name, "unknown principal");
                self.state = AttemptState::Failed(AttemptFailure::UnknownPrincipal);
                Ok(false)
            }
        }
    }

    /// Evaluate the permission policy for the confirmed principal
    ///
    /// `false` terminates the attempt; it is an outcome, not an error.
    pub async fn authorize(&mut self) -> Result<bool> {
        self.expect(AttemptState::ExistenceChecked, "authorize")?;
        let name = self.bound_name()?;
        let attributes = self.bound_attributes()?;

        if self.policy.decide(&name, &attributes).await {
            debug!(attempt = %self.attempt_id, principal = %name, "authorization granted");
            self.state = AttemptState::Authorized;
            Ok(true)
        } else {
            warn!(attempt = %self.attempt_id, principal = %name, "authorization denied");
            self.state = AttemptState::Failed(AttemptFailure::AuthorizationDenied);
            Ok(false)
        }
    }

    /// Finalize the attempt and freeze the identity
    ///
    /// Gathers the raw `Roles` attribute values and runs them through the
    /// domain's mapper stages; the resulting role set is immutable for the
    /// lifetime of the identity.
    pub fn succeed(&mut self) -> Result<()> {
        self.expect(AttemptState::Authorized, "succeed")?;
        let name = self.bound_name()?;
        let attributes = self.bound_attributes()?;

        let roles = self.stages.apply(&attributes.roles());
        info!(
            attempt = %self.attempt_id,
            principal = %name,
            roles = roles.len(),
            "authentication succeeded"
        );

        self.identity = Some(Identity {
            principal: name,
            roles,
            attempt_id: self.attempt_id,
        });
        self.state = AttemptState::Succeeded;
        Ok(())
    }

    /// The frozen identity of a succeeded attempt
    pub fn authorized_identity(&self) -> Result<&Identity> {
        match (&self.state, &self.identity) {
            (AttemptState::Succeeded, Some(identity)) => Ok(identity),
            _ => Err(AuthzError::InvalidState {
                operation: "authorized_identity",
                state: self.state,
            }),
        }
    }

    fn expect(&self, want: AttemptState, operation: &'static str) -> Result<()> {
        if self.state == want {
            Ok(())
        } else {
            Err(AuthzError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn bound_name(&self) -> Result<String> {
        self.name
            .clone()
            .ok_or(AuthzError::InvalidState {
                operation: "bound_name",
                state: self.state,
            })
    }

    fn bound_attributes(&self) -> Result<RawAttributes> {
        self.attributes
            .clone()
            .ok_or(AuthzError::InvalidState {
                operation: "bound_attributes",
                state: self.state,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PermitAll;
    use crate::realm::InMemoryRealm;

    fn pipeline_with(realm: InMemoryRealm) -> AuthorizationPipeline {
        AuthorizationPipeline::new(Arc::new(realm), Arc::new(PermitAll))
    }

    #[tokio::test]
    async fn test_states_advance_one_way() {
        let realm = InMemoryRealm::new();
        realm.add_identity("john").await;
        let mut pipeline = pipeline_with(realm);

        assert_eq!(pipeline.state(), AttemptState::Created);
        pipeline.set_authentication_name("john").await.unwrap();
        assert_eq!(pipeline.state(), AttemptState::NameSet);
        assert!(pipeline.exists().await.unwrap());
        assert_eq!(pipeline.state(), AttemptState::ExistenceChecked);
        assert!(pipeline.authorize().await.unwrap());
        assert_eq!(pipeline.state(), AttemptState::Authorized);
        pipeline.succeed().unwrap();
        assert_eq!(pipeline.state(), AttemptState::Succeeded);
    }

    #[tokio::test]
    async fn test_identity_before_succeed_is_invalid() {
        let realm = InMemoryRealm::new();
        realm.add_identity("john").await;
        let mut pipeline = pipeline_with(realm);

        pipeline.set_authentication_name("john").await.unwrap();
        let err = pipeline.authorized_identity().unwrap_err();
        assert!(matches!(err, AuthzError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_unknown_principal_terminates_attempt() {
        let mut pipeline = pipeline_with(InMemoryRealm::new());

        pipeline.set_authentication_name("ghost").await.unwrap();
        assert!(!pipeline.exists().await.unwrap());
        assert_eq!(
            pipeline.state(),
            AttemptState::Failed(AttemptFailure::UnknownPrincipal)
        );

        // The attempt is terminal; authorize is now out of order.
        assert!(matches!(
            pipeline.authorize().await,
            Err(AuthzError::InvalidState { .. })
        ));
    }
}
