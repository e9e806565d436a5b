//! TLS material variants
//!
//! Concrete key/trust material handed to a connection, tagged by context
//! kind. New kinds extend the enum; nothing dispatches over a type
//! hierarchy.

use crate::error::Result;
use rustls::{Certificate, ClientConfig, PrivateKey, RootCertStore, ServerConfig};
use std::fmt;
use std::sync::Arc;

/// Kind of TLS context a piece of material configures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMaterialKind {
    /// Outbound client context
    Client,

    /// Inbound server context
    Server,
}

impl fmt::Display for TlsMaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => f.write_str("client"),
            Self::Server => f.write_str("server"),
        }
    }
}

/// A TLS context snapshot
///
/// Cheap to clone; the underlying rustls configuration is shared behind an
/// `Arc`, so a snapshot handed to a connection stays valid even if the
/// registry entry is replaced afterwards.
#[derive(Clone)]
pub enum TlsMaterial {
    /// Client-side configuration
    Client(Arc<ClientConfig>),

    /// Server-side configuration
    Server(Arc<ServerConfig>),
}

impl TlsMaterial {
    /// Wrap a client configuration
    pub fn client(config: ClientConfig) -> Self {
        Self::Client(Arc::new(config))
    }

    /// Wrap a server configuration
    pub fn server(config: ServerConfig) -> Self {
        Self::Server(Arc::new(config))
    }

    /// Client material trusting the given roots, no client authentication
    pub fn client_with_roots(roots: RootCertStore) -> Self {
        let config = ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self::client(config)
    }

    /// Server material presenting a single certificate chain
    ///
    /// # Errors
    ///
    /// Returns [`crate::TlsError::Material`] when the chain or key is
    /// rejected by rustls.
    pub fn server_with_single_cert(chain: Vec<Certificate>, key: PrivateKey) -> Result<Self> {
        let config = ServerConfig::builder()
            .with_safe_defaults()
            .with_no_client_auth()
            .with_single_cert(chain, key)?;
        Ok(Self::server(config))
    }

    /// The kind of context this material configures
    pub fn kind(&self) -> TlsMaterialKind {
        match self {
            Self::Client(_) => TlsMaterialKind::Client,
            Self::Server(_) => TlsMaterialKind::Server,
        }
    }

    /// The client configuration, if this is client material
    pub fn as_client(&self) -> Option<&Arc<ClientConfig>> {
        match self {
            Self::Client(config) => Some(config),
            Self::Server(_) => None,
        }
    }

    /// The server configuration, if this is server material
    pub fn as_server(&self) -> Option<&Arc<ServerConfig>> {
        match self {
            Self::Client(_) => None,
            Self::Server(config) => Some(config),
        }
    }

    /// True when both values share the same underlying configuration
    pub fn same_snapshot(&self, other: &TlsMaterial) -> bool {
        match (self, other) {
            (Self::Client(a), Self::Client(b)) => Arc::ptr_eq(a, b),
            (Self::Server(a), Self::Server(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TlsMaterial").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_material_kind() {
        let material = TlsMaterial::client_with_roots(RootCertStore::empty());
        assert_eq!(material.kind(), TlsMaterialKind::Client);
        assert!(material.as_client().is_some());
        assert!(material.as_server().is_none());
    }

    #[test]
    fn test_snapshot_identity_survives_clone() {
        let material = TlsMaterial::client_with_roots(RootCertStore::empty());
        let cloned = material.clone();

        assert!(material.same_snapshot(&cloned));

        let other = TlsMaterial::client_with_roots(RootCertStore::empty());
        assert!(!material.same_snapshot(&other));
    }
}
