//! Error types for the authorization crate

use crate::pipeline::AttemptState;
use thiserror::Error;

/// Authorization errors
///
/// Authentication outcomes (unknown principal, denied authorization) are
/// NOT errors; they surface as boolean results and terminal pipeline
/// states. Errors here are configuration failures, collaborator failures,
/// and pipeline misuse.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Configuration validation or lookup failure
    #[error(transparent)]
    Config(#[from] palisade_config::ConfigError),

    /// A pipeline operation was invoked out of order
    #[error("invalid pipeline state: {operation} is not valid in state {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the pipeline was in
        state: AttemptState,
    },

    /// The realm collaborator failed or rejected the input
    #[error("realm failure: {0}")]
    RealmFailure(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
