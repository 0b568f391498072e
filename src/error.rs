//! Error types for question-forge operations.
//!
//! Validation findings are data, not errors: they accumulate in a
//! [`ValidationReport`](crate::validation::ValidationReport). The enums here
//! cover process-level failures only:
//! - Loading and saving the bank document
//! - Building placeholder filters for maintenance

use thiserror::Error;

/// Errors that can occur while reading, writing or rewriting a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("Question bank not found: {0}")]
    NotFound(String),

    #[error("Failed to parse question bank '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid question bank document: {0}")]
    InvalidDocument(String),

    #[error("Invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = BankError::NotFound("data/questions.json".to_string());
        assert_eq!(
            err.to_string(),
            "Question bank not found: data/questions.json"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BankError = io.into();
        assert!(matches!(err, BankError::Io(_)));
    }
}
