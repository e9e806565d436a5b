//! Error types for dynamic TLS context resolution

use thiserror::Error;

/// TLS subsystem errors
#[derive(Debug, Error)]
pub enum TlsError {
    /// Configuration validation or lookup failure at management time
    #[error(transparent)]
    Config(#[from] palisade_config::ConfigError),

    /// A reference could not be resolved at connection-attempt time
    #[error("TLS context resolution failed: {0}")]
    Resolution(String),

    /// Building TLS material failed
    #[error("TLS material error: {0}")]
    Material(#[from] rustls::Error),
}

/// Result type for TLS subsystem operations
pub type Result<T> = std::result::Result<T, TlsError>;
