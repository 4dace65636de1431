//! Core error types (deterministic only)

use thiserror::Error;

/// Errors raised while building pipeline values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Separator tokens collide or are otherwise unusable
    #[error("invalid separator: {reason}")]
    InvalidSeparator {
        /// Why the separator was rejected
        reason: String,
    },

    /// Punctuation mark set is empty or contains whitespace
    #[error("invalid punctuation marks: {reason}")]
    InvalidPunctuation {
        /// Why the mark set was rejected
        reason: String,
    },

    /// Language switch policy name not recognized
    #[error("unknown language switch policy '{0}', must be flag, remove-flags or remove-utterance")]
    UnknownPolicy(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
