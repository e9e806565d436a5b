//! Realm and attribute-source contracts
//!
//! A realm is the external collaborator answering "is this principal
//! known, and what raw attributes does it carry". The pipeline awaits it
//! synchronously; absence of attributes means the principal does not
//! exist.

use crate::error::{AuthzError, Result};
use crate::roles::RoleSet;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Name of the multi-valued attribute carrying raw roles
pub const ROLES_ATTRIBUTE: &str = "Roles";

/// Multi-valued attributes attached to a realm identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAttributes {
    attributes: HashMap<String, Vec<String>>,
}

impl RawAttributes {
    /// Create an empty attribute map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute to the given values, builder style
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Append a value to an attribute
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Values of the named attribute, empty when absent
    pub fn values(&self, name: &str) -> &[String] {
        self.attributes.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The raw roles carried by the `Roles` attribute
    pub fn roles(&self) -> RoleSet {
        self.values(ROLES_ATTRIBUTE).iter().cloned().collect()
    }
}

/// Identity and attribute lookup contract
#[async_trait]
pub trait RealmStore: Send + Sync {
    /// Reject malformed candidate principal names before any lookup
    ///
    /// The default implementation rejects empty names.
    async fn validate_name(&self, principal: &str) -> Result<()> {
        if principal.is_empty() {
            return Err(AuthzError::RealmFailure(
                "authentication name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Attributes of the named principal, or `None` when unknown
    async fn lookup(&self, principal: &str) -> Result<Option<RawAttributes>>;
}

/// In-memory realm for tests and embedded use
///
/// Mirrors a file-backed identity store: identities are added first, then
/// decorated with multi-valued attributes.
#[derive(Debug, Default)]
pub struct InMemoryRealm {
    identities: RwLock<HashMap<String, RawAttributes>>,
}

impl InMemoryRealm {
    /// Create an empty realm
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity with no attributes
    pub async fn add_identity(&self, principal: impl Into<String>) {
        let mut identities = self.identities.write().await;
        identities.entry(principal.into()).or_default();
    }

    /// Append values to an identity's attribute
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::RealmFailure`] when the identity is unknown.
    pub async fn add_identity_attribute(
        &self,
        principal: &str,
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<()> {
        let mut identities = self.identities.write().await;
        let attributes = identities
            .get_mut(principal)
            .ok_or_else(|| AuthzError::RealmFailure(format!("unknown identity: {principal}")))?;

        let name = name.into();
        for value in values {
            attributes.add(name.clone(), value);
        }
        Ok(())
    }

    /// Remove an identity
    pub async fn remove_identity(&self, principal: &str) {
        let mut identities = self.identities.write().await;
        identities.remove(principal);
    }
}

#[async_trait]
impl RealmStore for InMemoryRealm {
    async fn lookup(&self, principal: &str) -> Result<Option<RawAttributes>> {
        let identities = self.identities.read().await;
        Ok(identities.get(principal).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_unknown_identity_is_none() {
        let realm = InMemoryRealm::new();
        assert!(realm.lookup("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identity_attributes_accumulate() {
        let realm = InMemoryRealm::new();
        realm.add_identity("john").await;
        realm
            .add_identity_attribute("john", ROLES_ATTRIBUTE, ["user"])
            .await
            .unwrap();
        realm
            .add_identity_attribute("john", ROLES_ATTRIBUTE, ["operator"])
            .await
            .unwrap();

        let attributes = realm.lookup("john").await.unwrap().unwrap();
        let roles = attributes.roles();
        assert!(roles.contains("user"));
        assert!(roles.contains("operator"));
    }

    #[tokio::test]
    async fn test_attribute_on_unknown_identity_fails() {
        let realm = InMemoryRealm::new();
        let result = realm
            .add_identity_attribute("ghost", ROLES_ATTRIBUTE, ["user"])
            .await;

        assert!(matches!(result, Err(AuthzError::RealmFailure(_))));
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let realm = InMemoryRealm::new();
        assert!(realm.validate_name("").await.is_err());
        assert!(realm.validate_name("john").await.is_ok());
    }

    #[test]
    fn test_missing_attribute_yields_no_values() {
        let attributes = RawAttributes::new();
        assert!(attributes.values("Roles").is_empty());
        assert!(attributes.roles().is_empty());
    }
}
