//! Grapheme-to-phoneme backends
//!
//! A [`Backend`] turns a batch of punctuation-free units into one phoneme
//! string per unit. Backends are not shared between workers: every worker
//! asks a [`BackendFactory`] for its own instance.

pub mod command;
pub mod espeak;
pub mod festival;
pub mod mbrola;
pub mod segments;

pub use espeak::EspeakBackend;
pub use festival::FestivalBackend;
pub use mbrola::MbrolaBackend;
pub use segments::{Profile, SegmentsBackend};

use crate::error::{BackendError, BackendResult, ConfigError};
use crate::options::{BackendOptions, Feature};
use crate::probe::ProbeCache;
use phonoscribe_core::Separator;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The supported backend variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// espeak-ng with its IPA output
    Espeak,
    /// espeak-ng driving an mbrola voice
    EspeakMbrola,
    /// Festival lexicon lookup
    Festival,
    /// In-process orthography profiles
    Segments,
}

impl BackendKind {
    /// All variants
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Espeak,
        BackendKind::EspeakMbrola,
        BackendKind::Festival,
        BackendKind::Segments,
    ];

    /// Backend name as the caller spells it
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Espeak => "espeak",
            BackendKind::EspeakMbrola => "espeak-mbrola",
            BackendKind::Festival => "festival",
            BackendKind::Segments => "segments",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ConfigError::UnknownBackend {
                name: s.to_string(),
            })
    }
}

/// A grapheme-to-phoneme engine
pub trait Backend: Send {
    /// Backend name, used in errors and logs
    fn name(&self) -> &'static str;

    /// Returns true if the engine can run on this system
    fn is_available(&self) -> bool;

    /// Language codes accepted by [`Backend::transcribe`]
    fn supported_languages(&self) -> BTreeSet<String>;

    /// Returns true if `language` is accepted
    fn supports_language(&self, language: &str) -> bool {
        self.supported_languages().contains(language)
    }

    /// Returns true if the backend honors `feature`
    fn supports(&self, feature: Feature) -> bool;

    /// Fail fast on a language or option this backend cannot honor
    fn check(&self, options: &BackendOptions) -> BackendResult<()> {
        if !self.supports_language(&options.language) {
            return Err(BackendError::UnsupportedLanguage {
                backend: self.name(),
                language: options.language.clone(),
            });
        }

        if let Some(option) = options
            .requested_features()
            .into_iter()
            .find(|feature| !self.supports(*feature))
        {
            return Err(BackendError::UnsupportedOption {
                backend: self.name(),
                option,
            });
        }

        Ok(())
    }

    /// Load whatever the backend needs before the first batch
    fn prepare(&mut self, _options: &BackendOptions) -> BackendResult<()> {
        Ok(())
    }

    /// Transcribe `texts`, one output per input, in order
    fn transcribe(
        &mut self,
        texts: &[String],
        options: &BackendOptions,
    ) -> BackendResult<Vec<String>>;
}

/// Builds one backend instance per worker
pub trait BackendFactory: Send + Sync {
    /// Create a fresh backend
    fn create(&self) -> BackendResult<Box<dyn Backend>>;
}

impl<F> BackendFactory for F
where
    F: Fn() -> BackendResult<Box<dyn Backend>> + Send + Sync,
{
    fn create(&self) -> BackendResult<Box<dyn Backend>> {
        self()
    }
}

/// Factory for the built-in backends
#[derive(Debug, Clone)]
pub struct EngineFactory {
    kind: BackendKind,
    probes: Arc<ProbeCache>,
}

impl EngineFactory {
    /// Create a factory for `kind` sharing `probes`
    pub fn new(kind: BackendKind, probes: Arc<ProbeCache>) -> Self {
        Self { kind, probes }
    }

    /// Backend variant built by this factory
    pub fn kind(&self) -> BackendKind {
        self.kind
    }
}

impl BackendFactory for EngineFactory {
    fn create(&self) -> BackendResult<Box<dyn Backend>> {
        let probes = Arc::clone(&self.probes);
        Ok(match self.kind {
            BackendKind::Espeak => Box::new(EspeakBackend::new(probes)),
            BackendKind::EspeakMbrola => Box::new(MbrolaBackend::new(probes)),
            BackendKind::Festival => Box::new(FestivalBackend::new(probes)),
            BackendKind::Segments => Box::new(SegmentsBackend::new()),
        })
    }
}

/// Render words given as syllables of phones, with a trailing word separator
pub(crate) fn render_words<W, S, P>(words: W, separator: &Separator) -> String
where
    W: IntoIterator<Item = S>,
    S: IntoIterator<Item = P>,
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    let mut out = String::new();
    for word in words {
        let syllables: Vec<String> = word
            .into_iter()
            .map(|syllable| {
                syllable
                    .into_iter()
                    .map(|phone| phone.as_ref().to_string())
                    .collect::<Vec<_>>()
                    .join(separator.phone())
            })
            .filter(|syllable| !syllable.is_empty())
            .collect();
        if syllables.is_empty() {
            continue;
        }
        out.push_str(&syllables.join(separator.syllable()));
        out.push_str(separator.word());
    }
    out
}
