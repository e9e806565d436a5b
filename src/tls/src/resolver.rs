//! Dynamic TLS context resources and per-connection resolution
//!
//! A dynamic TLS context names an authentication context instead of
//! capturing key material at service start. Every [`resolve`] call
//! re-reads the current binding, so rewriting the `authentication-context`
//! attribute redirects the next connection without any reload.
//!
//! [`resolve`]: DynamicTlsContextResolver::resolve

use crate::context::{AuthenticationContext, Destination};
use crate::error::{Result, TlsError};
use crate::material::TlsMaterial;
use palisade_config::{ConstraintViolation, ResourceRegistry, ValidationError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Attribute name of the authentication-context reference
pub const AUTHENTICATION_CONTEXT: &str = "authentication-context";

/// Configuration submitted when adding a dynamic TLS context resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicTlsContextConfig {
    /// Name of the authentication context driving per-destination selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_context: Option<String>,
}

impl DynamicTlsContextConfig {
    /// Configuration with no attributes set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authentication-context reference
    pub fn with_authentication_context(mut self, name: impl Into<String>) -> Self {
        self.authentication_context = Some(name.into());
        self
    }

    /// Validate the configuration
    ///
    /// The `authentication-context` attribute is required and is the sole
    /// member of its alternatives group, so its absence violates both
    /// constraints; the aggregate failure reports the two codes together.
    pub fn validate(&self) -> palisade_config::Result<()> {
        let mut violations = ValidationError::new();

        if self.authentication_context.is_none() {
            violations.push(ConstraintViolation::required(AUTHENTICATION_CONTEXT));
            violations.push(ConstraintViolation::alternative_required(
                AUTHENTICATION_CONTEXT,
                &[AUTHENTICATION_CONTEXT],
            ));
        }

        violations.into_result()
    }
}

/// Stored snapshot of a validated dynamic TLS context resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicTlsContextRecord {
    /// Current authentication-context binding
    pub authentication_context: String,
}

/// Outcome of a runtime attribute write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeUpdate {
    /// True when dependent services must reload to observe the change
    pub requires_reload: bool,
}

struct SubsystemState {
    auth_contexts: ResourceRegistry<AuthenticationContext>,
    ssl_contexts: ResourceRegistry<TlsMaterial>,
    dynamic_contexts: ResourceRegistry<DynamicTlsContextRecord>,
    default_ssl_context: RwLock<Option<String>>,
}

/// The TLS subsystem's configuration surface
///
/// Holds the name-keyed registries behind the dynamic resolution path.
/// Cloning shares the underlying state.
#[derive(Clone)]
pub struct TlsSubsystem {
    state: Arc<SubsystemState>,
}

impl TlsSubsystem {
    /// Create an empty subsystem
    pub fn new() -> Self {
        Self {
            state: Arc::new(SubsystemState {
                auth_contexts: ResourceRegistry::new("authentication-context"),
                ssl_contexts: ResourceRegistry::new("ssl-context"),
                dynamic_contexts: ResourceRegistry::new("dynamic-client-ssl-context"),
                default_ssl_context: RwLock::new(None),
            }),
        }
    }

    // ------------------------------------------------------------------
    // authentication-context resources
    // ------------------------------------------------------------------

    /// Register an authentication context
    pub fn add_authentication_context(
        &self,
        name: impl Into<String>,
        context: AuthenticationContext,
    ) -> Result<()> {
        self.state.auth_contexts.add(name, context)?;
        Ok(())
    }

    /// Replace an authentication context wholesale
    pub fn replace_authentication_context(
        &self,
        name: &str,
        context: AuthenticationContext,
    ) -> Result<()> {
        self.state.auth_contexts.replace(name, context)?;
        Ok(())
    }

    /// Remove an authentication context
    ///
    /// Dynamic resources referencing it keep their binding; the dangling
    /// name surfaces as a resolution failure on the next connection
    /// attempt, not here.
    pub fn remove_authentication_context(&self, name: &str) -> Result<()> {
        self.state.auth_contexts.remove(name)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // ssl-context resources
    // ------------------------------------------------------------------

    /// Register TLS material under a name
    pub fn add_ssl_context(&self, name: impl Into<String>, material: TlsMaterial) -> Result<()> {
        self.state.ssl_contexts.add(name, material)?;
        Ok(())
    }

    /// Replace named TLS material wholesale
    pub fn replace_ssl_context(&self, name: &str, material: TlsMaterial) -> Result<()> {
        self.state.ssl_contexts.replace(name, material)?;
        Ok(())
    }

    /// Remove named TLS material
    pub fn remove_ssl_context(&self, name: &str) -> Result<()> {
        self.state.ssl_contexts.remove(name)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // dynamic-client-ssl-context resources
    // ------------------------------------------------------------------

    /// Add a dynamic TLS context resource
    ///
    /// # Errors
    ///
    /// Aggregate validation failure when the configuration is incomplete;
    /// duplicate error when the name is taken.
    pub fn add_dynamic_context(
        &self,
        name: impl Into<String>,
        config: DynamicTlsContextConfig,
    ) -> Result<()> {
        config.validate()?;

        // validate() guarantees the attribute is present.
        let authentication_context = config.authentication_context.ok_or_else(|| {
            palisade_config::ConfigError::from(
                ValidationError::new().with(ConstraintViolation::required(AUTHENTICATION_CONTEXT)),
            )
        })?;

        let name = name.into();
        self.state.dynamic_contexts.add(
            name.clone(),
            DynamicTlsContextRecord {
                authentication_context,
            },
        )?;
        info!(name = %name, "dynamic TLS context added");
        Ok(())
    }

    /// Read the current snapshot of a dynamic TLS context resource
    pub fn read_dynamic_context(&self, name: &str) -> Result<Arc<DynamicTlsContextRecord>> {
        Ok(self.state.dynamic_contexts.get(name)?)
    }

    /// Rewrite the `authentication-context` attribute of a dynamic resource
    ///
    /// Takes effect on the next resolution; no reload is required.
    pub fn write_authentication_context(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<AttributeUpdate> {
        let value = value.into();
        self.state.dynamic_contexts.update(name, |_current| {
            DynamicTlsContextRecord {
                authentication_context: value.clone(),
            }
        })?;
        info!(name = %name, "authentication-context attribute rewritten");
        Ok(AttributeUpdate {
            requires_reload: false,
        })
    }

    /// Remove a dynamic TLS context resource
    pub fn remove_dynamic_context(&self, name: &str) -> Result<()> {
        self.state.dynamic_contexts.remove(name)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // subsystem-level default
    // ------------------------------------------------------------------

    /// Point the process-wide default SSL context at a named resource
    ///
    /// The write itself succeeds immediately, but consumers that captured
    /// the previous default as a fixed object only observe the change
    /// after a reload, so the outcome is flagged accordingly.
    pub fn set_default_ssl_context(&self, name: impl Into<String>) -> Result<AttributeUpdate> {
        let name = name.into();
        if !self.state.dynamic_contexts.contains(&name) && !self.state.ssl_contexts.contains(&name)
        {
            return Err(TlsError::Config(palisade_config::ConfigError::NotFound(
                format!("ssl-context '{name}'"),
            )));
        }

        *self.state.default_ssl_context.write() = Some(name.clone());
        info!(name = %name, "default-ssl-context attribute rewritten");
        Ok(AttributeUpdate {
            requires_reload: true,
        })
    }

    /// Current default SSL context name, if any
    pub fn default_ssl_context(&self) -> Option<String> {
        self.state.default_ssl_context.read().clone()
    }

    // ------------------------------------------------------------------
    // resolution
    // ------------------------------------------------------------------

    /// A resolver bound to the named dynamic TLS context resource
    ///
    /// Binding is by name only; a dangling or later-removed resource
    /// surfaces when [`DynamicTlsContextResolver::resolve`] is called.
    pub fn resolver(&self, name: impl Into<String>) -> DynamicTlsContextResolver {
        DynamicTlsContextResolver {
            name: name.into(),
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for TlsSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-connection TLS context resolver
///
/// # Thread Safety
///
/// Safe to share across connection threads; every call reads the current
/// registry snapshots.
#[derive(Clone)]
pub struct DynamicTlsContextResolver {
    name: String,
    state: Arc<SubsystemState>,
}

impl DynamicTlsContextResolver {
    /// Name of the dynamic TLS context resource this resolver is bound to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve TLS material for one outbound connection
    ///
    /// Re-reads the resource record, follows its current
    /// `authentication-context` binding, selects the SSL context named by
    /// the first matching destination rule, and returns that context's
    /// current material snapshot.
    ///
    /// # Errors
    ///
    /// [`TlsError::Resolution`] when any name in the chain is dangling or
    /// no rule matches the destination.
    pub fn resolve(&self, destination: &Destination) -> Result<TlsMaterial> {
        let record = self
            .state
            .dynamic_contexts
            .get(&self.name)
            .map_err(|err| TlsError::Resolution(err.to_string()))?;

        let context = self
            .state
            .auth_contexts
            .get(&record.authentication_context)
            .map_err(|err| TlsError::Resolution(err.to_string()))?;

        let ssl_context = context.select(destination).ok_or_else(|| {
            TlsError::Resolution(format!(
                "authentication-context '{}' has no rule matching {}:{}",
                record.authentication_context, destination.host, destination.port
            ))
        })?;

        let material = self
            .state
            .ssl_contexts
            .get(ssl_context)
            .map_err(|err| TlsError::Resolution(err.to_string()))?;

        debug!(
            resource = %self.name,
            authentication_context = %record.authentication_context,
            ssl_context = %ssl_context,
            host = %destination.host,
            port = destination.port,
            "TLS context resolved"
        );
        Ok((*material).clone())
    }
}
