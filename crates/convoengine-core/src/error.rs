//! Error types for Conversation Engine

use thiserror::Error;

/// Main error type for Conversation Engine operations
///
/// Most anomalies in this crate are benign (a missing interaction, an orphan
/// message waiting for its parent) and are absorbed locally with a diagnostic
/// log. The variants here are the failures that callers genuinely need to
/// observe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvoError {
    /// A new history load was started while this one was still pending
    #[error("history load superseded by a newer load")]
    LoadingSuperseded,
}

/// Result type alias using ConvoError
pub type ConvoResult<T> = Result<T, ConvoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvoError::LoadingSuperseded;
        assert_eq!(
            format!("{}", err),
            "history load superseded by a newer load"
        );
    }
}
