//! Unified error types for the domain layer
//!
//! Expected rule violations are not errors here: the validator reports them
//! as [`Verdict::Rejected`](crate::archetypes::Verdict) so they can be shown
//! to the user verbatim. `DomainError` covers everything else, most notably
//! asking a template about a category or trait it does not define.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid input that is not a rules question)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A template was asked about a category/trait combination it has no rule for.
    ///
    /// This is a programming fault in the caller, not a user-facing rejection.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for malformed requests.
    ///
    /// # Example
    /// ```ignore
    /// if flags.xp && flags.freebie {
    ///     return Err(DomainError::validation("xp and freebie modes are exclusive"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether this error signals a caller bug rather than bad user input.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}
