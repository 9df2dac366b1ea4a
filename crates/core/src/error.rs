//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// stale references, lifecycle rules). Storage faults belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required value was missing, blank or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist (e.g. a stale list position).
    #[error("not found: {0}")]
    NotFound(String),

    /// A purchase was attempted on a record that is no longer available.
    #[error("already sold: {0}")]
    AlreadySold(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_sold(msg: impl Into<String>) -> Self {
        Self::AlreadySold(msg.into())
    }

    /// Reject a blank (empty or whitespace-only) required field.
    pub fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
        if value.trim().is_empty() {
            return Err(Self::validation(format!("{field} cannot be empty")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(DomainError::require_non_blank("Brand", "Toyota").is_ok());

        let err = DomainError::require_non_blank("Brand", "   ").unwrap_err();
        assert_eq!(err, DomainError::Validation("Brand cannot be empty".to_string()));
        assert!(DomainError::require_non_blank("Brand", "").is_err());
    }

    #[test]
    fn display_includes_context() {
        let err = DomainError::not_found("position 3 (inventory has 2 cars)");
        assert_eq!(err.to_string(), "not found: position 3 (inventory has 2 cars)");
    }
}
