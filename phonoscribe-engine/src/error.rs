//! Layered error types
//!
//! Backends report [`BackendError`]s. The engine surfaces exactly two fatal
//! kinds to callers: [`PhonemizeError::Configuration`] for anything detected
//! before work starts (unknown backend, unsupported language or option) and
//! [`PhonemizeError::Execution`] when a backend fails mid-batch.

use crate::options::Feature;
use phonoscribe_core::CoreError;
use thiserror::Error;

/// Problems with what the caller asked for
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Backend name not in the supported set
    #[error("unknown backend '{name}', must be one of: espeak, espeak-mbrola, festival, segments")]
    UnknownBackend {
        /// Name given by the caller
        name: String,
    },

    /// Backend engine is not installed
    #[error("{backend} backend is not installed on this system")]
    BackendUnavailable {
        /// Backend name
        backend: &'static str,
    },

    /// Language not supported by the backend
    #[error("language '{language}' is not supported by the {backend} backend")]
    UnsupportedLanguage {
        /// Backend name
        backend: &'static str,
        /// Requested language
        language: String,
    },

    /// Option not applicable to the backend
    #[error("option '{option}' is not supported by the {backend} backend")]
    UnsupportedOption {
        /// Backend name
        backend: &'static str,
        /// The offending option
        option: Feature,
    },

    /// Invalid option value
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// Invalid separator or punctuation value
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration file could not be read or parsed
    #[error("configuration error in {path}: {reason}")]
    File {
        /// The configuration file path
        path: String,
        /// What went wrong
        reason: String,
    },
}

/// Errors raised by a backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Language not supported
    #[error("language '{language}' is not supported by the {backend} backend")]
    UnsupportedLanguage {
        /// Backend name
        backend: &'static str,
        /// Requested language
        language: String,
    },

    /// Option not supported
    #[error("option '{option}' is not supported by the {backend} backend")]
    UnsupportedOption {
        /// Backend name
        backend: &'static str,
        /// The offending option
        option: Feature,
    },

    /// Engine not installed
    #[error("{backend} backend is not installed on this system")]
    Unavailable {
        /// Backend name
        backend: &'static str,
    },

    /// Profile file for the segments backend is unreadable or invalid
    #[error("failed to load profile {path}: {reason}")]
    Profile {
        /// Profile path or name
        path: String,
        /// What went wrong
        reason: String,
    },

    /// External program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// External program exited with an error
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        /// Program name
        program: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Output could not be interpreted
    #[error("malformed output from {backend}: {reason}")]
    Malformed {
        /// Backend name
        backend: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

/// Errors surfaced by the phonemizer
#[derive(Error, Debug)]
pub enum PhonemizeError {
    /// Detected before any backend invocation
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A backend failed during a run; no partial result is returned
    #[error("backend failed{}: {source}", describe_chunk(.chunk))]
    Execution {
        /// Chunk that failed, `None` outside of a run
        chunk: Option<usize>,
        /// The backend error
        #[source]
        source: BackendError,
    },
}

fn describe_chunk(chunk: &Option<usize>) -> String {
    chunk.map(|c| format!(" on chunk {c}")).unwrap_or_default()
}

impl PhonemizeError {
    /// Route a backend error: capability problems are configuration errors
    pub fn from_backend(error: BackendError, chunk: Option<usize>) -> Self {
        match error {
            BackendError::UnsupportedLanguage { backend, language } => {
                ConfigError::UnsupportedLanguage { backend, language }.into()
            }
            BackendError::UnsupportedOption { backend, option } => {
                ConfigError::UnsupportedOption { backend, option }.into()
            }
            BackendError::Unavailable { backend } => {
                ConfigError::BackendUnavailable { backend }.into()
            }
            BackendError::Profile { path, reason } => ConfigError::File { path, reason }.into(),
            source => PhonemizeError::Execution { chunk, source },
        }
    }

    /// Returns true for configuration errors
    pub fn is_configuration(&self) -> bool {
        matches!(self, PhonemizeError::Configuration(_))
    }
}

impl From<CoreError> for PhonemizeError {
    fn from(err: CoreError) -> Self {
        PhonemizeError::Configuration(ConfigError::Core(err))
    }
}

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Result type for phonemizer operations
pub type Result<T> = std::result::Result<T, PhonemizeError>;
