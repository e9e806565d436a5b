//! # Palisade TLS
//!
//! Dynamic TLS context resolution for the Palisade security subsystem.
//!
//! A dynamic TLS context is configured with the NAME of an authentication
//! context rather than a fixed context object. The binding is followed at
//! connection time, on every connection, so management writes to the
//! `authentication-context` attribute redirect subsequent connections with
//! no reload, and different destinations can receive different key/trust
//! material through the context's match rules.
//!
//! ## Example
//!
//! ```rust
//! use palisade_tls::{
//!     AuthenticationContext, Destination, DynamicTlsContextConfig, MatchRule,
//!     TlsMaterial, TlsSubsystem,
//! };
//! use rustls::RootCertStore;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subsystem = TlsSubsystem::new();
//!     subsystem.add_ssl_context(
//!         "default",
//!         TlsMaterial::client_with_roots(RootCertStore::empty()),
//!     )?;
//!     subsystem.add_authentication_context(
//!         "ac",
//!         AuthenticationContext::new().with_rule(MatchRule::for_ssl_context("default")),
//!     )?;
//!     subsystem.add_dynamic_context(
//!         "dcsc",
//!         DynamicTlsContextConfig::new().with_authentication_context("ac"),
//!     )?;
//!
//!     let resolver = subsystem.resolver("dcsc");
//!     let material = resolver.resolve(&Destination::new("backend.example", 443))?;
//!     assert!(material.as_client().is_some());
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod error;
pub mod material;
pub mod resolver;

// Re-export commonly used types
pub use context::{AuthenticationContext, Destination, MatchRule};
pub use error::{Result, TlsError};
pub use material::{TlsMaterial, TlsMaterialKind};
pub use resolver::{
    AttributeUpdate, DynamicTlsContextConfig, DynamicTlsContextRecord, DynamicTlsContextResolver,
    TlsSubsystem, AUTHENTICATION_CONTEXT,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
