//! # Palisade Authorization
//!
//! Role mapping and the staged authorization pipeline of the Palisade
//! security subsystem.
//!
//! ## Features
//!
//! - **Regex role mapping** with single- or all-occurrence substitution,
//!   back-references, and pass-through of non-mapped roles
//! - **Staged authentication attempts** (`set name -> exists -> authorize
//!   -> succeed`) modeled as an explicit state machine
//! - **Pluggable collaborators** for identity lookup and permission
//!   decisions
//! - **Aggregate configuration validation** reporting every violated
//!   constraint at resource-add time
//!
//! ## Example
//!
//! ```rust
//! use palisade_authz::{
//!     AuthorizationPipeline, InMemoryRealm, PermitAll, RegexRoleMapper,
//!     RegexRoleMapperConfig, RoleMappingStages, ROLES_ATTRIBUTE,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let realm = InMemoryRealm::new();
//!     realm.add_identity("john").await;
//!     realm
//!         .add_identity_attribute("john", ROLES_ATTRIBUTE, ["app-guest"])
//!         .await?;
//!
//!     let mapper = RegexRoleMapper::new(&RegexRoleMapperConfig::new("guest", "user"))?;
//!     let stages = RoleMappingStages::new().with_mapper(mapper);
//!
//!     let mut attempt = AuthorizationPipeline::new(Arc::new(realm), Arc::new(PermitAll))
//!         .with_stages(stages);
//!     attempt.set_authentication_name("john").await?;
//!     assert!(attempt.exists().await?);
//!     assert!(attempt.authorize().await?);
//!     attempt.succeed()?;
//!
//!     let identity = attempt.authorized_identity()?;
//!     assert!(identity.roles().contains("app-user"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod policy;
pub mod realm;
pub mod roles;

// Re-export commonly used types
pub use error::{AuthzError, Result};
pub use mapper::{
    RegexRoleMapper, RegexRoleMapperConfig, RoleMappingStages, RoleMappingStrategy,
};
pub use pipeline::{AttemptFailure, AttemptState, AuthorizationPipeline, Identity};
pub use policy::{DenyAll, PermissionPolicy, PermitAll, RequireRawRole};
pub use realm::{InMemoryRealm, RawAttributes, RealmStore, ROLES_ATTRIBUTE};
pub use roles::{Role, RoleSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
