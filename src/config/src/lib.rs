//! # Palisade Configuration Store
//!
//! Name-keyed registry of validated configuration resources with atomic
//! snapshot replacement, plus the constraint-violation reporting used by
//! every resource kind in the subsystem.
//!
//! ## Example
//!
//! ```rust
//! use palisade_config::ResourceRegistry;
//!
//! let registry: ResourceRegistry<String> = ResourceRegistry::new("ssl-context");
//! registry.add("client", "tls-1.3".to_string()).unwrap();
//!
//! let snapshot = registry.get("client").unwrap();
//! assert_eq!(snapshot.as_str(), "tls-1.3");
//! ```

pub mod error;
pub mod registry;

pub use error::{codes, ConfigError, ConstraintViolation, Result, ValidationError};
pub use registry::ResourceRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
