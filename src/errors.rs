//! Unified error type for the laundry service.
//!
//! Every fallible operation in `core`, `config` and `api` returns [`Result`]. The variants line up
//! with how callers must react: validation problems are the caller's fault and are never retried,
//! missing references mean nothing was written, and database failures carry the raw store error
//! for the logs.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// One or more request fields are missing or malformed.
    ///
    /// All problems found in a single request are collected here instead of stopping at the first.
    #[error("Validation failed: {}", .violations.join("; "))]
    Validation {
        /// Human-readable description of each violation
        violations: Vec<String>,
    },

    /// A referenced row does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up (`"Transaction"`, `"Cloth"`, ...)
        entity: &'static str,
        /// The id that missed
        id: i64,
    },

    /// Underlying persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// HTTP listener could not be bound or stopped unexpectedly
    #[error("Server error: {message}")]
    Server {
        /// What went wrong
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a validation error with a single violation.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation {
            violations: vec![message.into()],
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_all_violations() {
        let err = Error::Validation {
            violations: vec!["user_id is required".to_string(), "quantity is required".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed: user_id is required; quantity is required"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            entity: "Cloth",
            id: 42,
        };
        assert_eq!(err.to_string(), "Cloth 42 not found");
    }
}
