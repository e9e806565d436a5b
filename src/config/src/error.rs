//! Error types for the configuration store

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable constraint codes reported by configuration validation.
///
/// Every violated constraint carries one of these codes; an aggregate
/// failure lists each distinct code so callers can assert on the full set.
pub mod codes {
    /// A required attribute was not supplied.
    pub const REQUIRED_ATTRIBUTE_MISSING: &str = "required-attribute-missing";

    /// None of a set of mutually-exclusive alternative attributes was supplied.
    pub const ALTERNATIVE_ATTRIBUTE_REQUIRED: &str = "alternative-attribute-required";

    /// An attribute value failed to compile as a regular expression.
    pub const INVALID_PATTERN: &str = "invalid-pattern";

    /// An attribute value was shorter than the permitted minimum length.
    pub const MIN_LENGTH: &str = "min-length";
}

/// Configuration store errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Resource validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Named resource does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Named resource already registered
    #[error("duplicate resource: {0}")]
    Duplicate(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A single violated configuration constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintViolation {
    /// Stable constraint code (see [`codes`])
    pub code: &'static str,

    /// Attribute the constraint applies to
    pub attribute: String,

    /// Human-readable description of the violation
    pub message: String,
}

impl ConstraintViolation {
    /// A required attribute is absent
    pub fn required(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        let message = format!("required attribute '{attribute}' was not provided");
        Self {
            code: codes::REQUIRED_ATTRIBUTE_MISSING,
            attribute,
            message,
        }
    }

    /// None of a set of alternative attributes is present
    pub fn alternative_required(attribute: impl Into<String>, alternatives: &[&str]) -> Self {
        let attribute = attribute.into();
        let message = format!(
            "at least one of the alternative attributes [{}] must be provided for '{attribute}'",
            alternatives.join(", ")
        );
        Self {
            code: codes::ALTERNATIVE_ATTRIBUTE_REQUIRED,
            attribute,
            message,
        }
    }

    /// An attribute value does not compile as a regular expression
    pub fn invalid_pattern(
        attribute: impl Into<String>,
        value: &str,
        cause: impl fmt::Display,
    ) -> Self {
        let attribute = attribute.into();
        let message =
            format!("'{value}' is not a valid regular expression for parameter {attribute}: {cause}");
        Self {
            code: codes::INVALID_PATTERN,
            attribute,
            message,
        }
    }

    /// An attribute value is shorter than the permitted minimum
    pub fn min_length(attribute: impl Into<String>, value: &str, min: usize) -> Self {
        let attribute = attribute.into();
        let message = format!(
            "'{value}' is an invalid value for parameter {attribute}. \
             Values must have a minimum length of {min} characters"
        );
        Self {
            code: codes::MIN_LENGTH,
            attribute,
            message,
        }
    }
}

/// Aggregate validation failure
///
/// Collects every constraint violated by one configuration operation so the
/// failure reports all of them together rather than only the first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationError {
    violations: Vec<ConstraintViolation>,
}

impl ValidationError {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation
    pub fn push(&mut self, violation: ConstraintViolation) {
        self.violations.push(violation);
    }

    /// Record a violation, builder style
    pub fn with(mut self, violation: ConstraintViolation) -> Self {
        self.push(violation);
        self
    }

    /// True when nothing was violated
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The recorded violations, in the order they were detected
    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    /// Distinct constraint codes present in this failure, in detection order
    pub fn codes(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = Vec::new();
        for violation in &self.violations {
            if !codes.contains(&violation.code) {
                codes.push(violation.code);
            }
        }
        codes
    }

    /// True when the given constraint code is among the violations
    pub fn contains_code(&self, code: &str) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    /// `Ok(())` when empty, otherwise the aggregate failure
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration validation failed")?;
        for violation in &self.violations {
            write!(f, "; [{}] {}", violation.code, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
