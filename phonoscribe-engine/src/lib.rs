//! Parallel, structure-preserving phonemization
//!
//! This crate drives grapheme-to-phoneme backends (espeak-ng, espeak-ng with
//! mbrola voices, festival and in-process orthography profiles) and keeps
//! the document structure they do not preserve themselves: line breaks,
//! trailing separators and punctuation. Units are split into balanced
//! chunks and transcribed on a worker pool; the output is identical for any
//! number of workers.
//!
//! # Example
//!
//! ```rust
//! use phonoscribe_engine::{Document, PhonemizeConfig, Phonemizer, StaticProbe};
//!
//! let config = PhonemizeConfig::builder()
//!     .backend("segments")
//!     .language("esperanto")
//!     .strip(true)
//!     .build()?;
//!
//! // The segments backend runs in process, no engine needs to be probed
//! let phonemizer = Phonemizer::with_probe(config, StaticProbe::new())?;
//! let output = phonemizer.phonemize(vec!["ĉevalo", "ĝis revido"])?;
//!
//! assert_eq!(output, Document::from(vec!["tʃevalo", "dʒis revido"]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod chunker;
pub mod config;
pub mod error;
pub mod executor;
pub mod options;
pub mod phonemizer;
pub mod probe;
pub mod scheduler;

// Re-export key types
pub use backend::{Backend, BackendFactory, BackendKind, EngineFactory};
pub use config::{Options, PhonemizeConfig, PhonemizeConfigBuilder};
pub use error::{BackendError, BackendResult, ConfigError, PhonemizeError, Result};
pub use executor::{ExecutionMode, Executor};
pub use options::{BackendOptions, Feature};
pub use phonemizer::{phonemize, Phonemizer, Transcription};
pub use probe::{EngineInfo, EngineProbe, ProbeCache, StaticProbe, SystemProbe};
pub use scheduler::Scheduler;

// Re-export from core for convenience
pub use phonoscribe_core::{Document, LanguageSwitch, LanguageSwitchReport, Separator};
