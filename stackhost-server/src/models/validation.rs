//! Validation error types

use std::fmt;

/// Client input that fails a precondition. Always a 400, never touches
/// the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Path id is not an integer
    InvalidId { resource: &'static str },

    /// One or more required body fields are absent or blank
    Required { fields: &'static str },

    /// Body is not JSON, or a field has the wrong type
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { resource } => write!(f, "Invalid {} ID", resource),
            Self::Required { fields } => write!(f, "{} required", fields),
            Self::MalformedBody { .. } => write!(f, "Invalid request body"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::Required {
                fields: "Name and email"
            }
            .to_string(),
            "Name and email required"
        );
        assert_eq!(
            ValidationError::InvalidId { resource: "user" }.to_string(),
            "Invalid user ID"
        );
    }

    #[test]
    fn malformed_body_hides_parser_detail() {
        let err = ValidationError::MalformedBody {
            reason: "expected value at line 1 column 1".into(),
        };
        assert_eq!(err.to_string(), "Invalid request body");
    }
}
