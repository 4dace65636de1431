//! The phonemization pipeline
//!
//! ```text
//! document -> split -> strip punctuation -> scheduler (backend workers)
//!          -> trim separators -> language switches -> restore punctuation
//!          -> assemble
//! ```
//!
//! Language switches are handled before punctuation comes back, so restored
//! parentheses are never mistaken for language tags. An utterance removed
//! by the `remove-utterance` policy stays empty.

use crate::backend::{BackendFactory, EngineFactory};
use crate::config::{Options, PhonemizeConfig};
use crate::error::{BackendError, ConfigError, PhonemizeError, Result};
use crate::options::{BackendOptions, Feature};
use crate::probe::{EngineProbe, ProbeCache, SystemProbe};
use crate::scheduler::Scheduler;
use phonoscribe_core::{
    split, Document, LanguageSwitch, LanguageSwitchDetector, LanguageSwitchReport, Punctuation,
    PunctuationMap, ResultAssembler,
};
use std::sync::Arc;

/// Output of a run together with its diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    /// Phonemes, in the shape of the input
    pub output: Document,
    /// Lines where the backend switched language
    pub language_switches: LanguageSwitchReport,
}

/// A configured, validated phonemizer
///
/// Construction performs every configuration check: the backend exists, is
/// installed, supports the language and every requested option. A built
/// phonemizer can be reused for any number of documents.
pub struct Phonemizer {
    config: PhonemizeConfig,
    backend_name: &'static str,
    factory: Box<dyn BackendFactory>,
    options: BackendOptions,
    punctuation: Punctuation,
    detect_switches: bool,
    scheduler: Scheduler,
}

impl std::fmt::Debug for Phonemizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Phonemizer")
            .field("backend", &self.backend_name)
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl Phonemizer {
    /// Create a phonemizer probing the engines installed on this system
    pub fn new(config: PhonemizeConfig) -> Result<Self> {
        Self::with_probe(config, SystemProbe)
    }

    /// Create a phonemizer with engine information from `probe`
    pub fn with_probe(config: PhonemizeConfig, probe: impl EngineProbe + 'static) -> Result<Self> {
        config.validate()?;
        let kind = config.backend_kind()?;
        let factory = EngineFactory::new(kind, Arc::new(ProbeCache::new(probe)));
        Self::with_backend(config, factory)
    }

    /// Create a phonemizer over a custom backend; `config.backend` is ignored
    pub fn with_backend(
        config: PhonemizeConfig,
        factory: impl BackendFactory + 'static,
    ) -> Result<Self> {
        if config.language.trim().is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".to_string()).into());
        }
        config.options.validate()?;

        let options = config.options.backend_options(&config.language);
        let configuration = |e: BackendError| PhonemizeError::from_backend(e, None);

        let mut backend = factory.create().map_err(configuration)?;
        if !backend.is_available() {
            return Err(ConfigError::BackendUnavailable {
                backend: backend.name(),
            }
            .into());
        }
        backend.check(&options).map_err(configuration)?;
        backend.prepare(&options).map_err(configuration)?;

        let punctuation = config.options.punctuation()?;
        let scheduler = Scheduler::new(config.options.njobs)?;

        log::info!(
            "{} backend ready for language {} with {} jobs",
            backend.name(),
            config.language,
            scheduler.jobs()
        );

        Ok(Self {
            backend_name: backend.name(),
            detect_switches: backend.supports(Feature::LanguageSwitch),
            factory: Box::new(factory),
            options,
            punctuation,
            scheduler,
            config,
        })
    }

    /// The configuration this phonemizer was built from
    pub fn config(&self) -> &PhonemizeConfig {
        &self.config
    }

    /// Name of the backend in use
    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    /// Phonemize a document, returning output of the same shape
    pub fn phonemize(&self, document: impl Into<Document>) -> Result<Document> {
        Ok(self.phonemize_with_report(document)?.output)
    }

    /// Phonemize a document and report language switches
    pub fn phonemize_with_report(&self, document: impl Into<Document>) -> Result<Transcription> {
        let document = document.into();
        let split = split(&document);

        let (texts, maps): (Vec<String>, Vec<PunctuationMap>) = split
            .units
            .iter()
            .map(|unit| self.punctuation.strip(unit.text()))
            .unzip();

        let raw = self
            .scheduler
            .run(texts, self.factory.as_ref(), &self.options)?;

        let separator = &self.options.separator;
        let trimmed: Vec<String> = raw
            .iter()
            .map(|output| separator.trim_end(output).to_string())
            .collect();

        let (outputs, language_switches) = if self.detect_switches {
            LanguageSwitchDetector::new(self.options.language_switch).scan(trimmed)
        } else {
            (trimmed, LanguageSwitchReport::default())
        };

        let removed = |line: usize| {
            language_switches.policy() == LanguageSwitch::RemoveUtterance
                && language_switches.contains(line)
        };

        let restored: Vec<String> = outputs
            .into_iter()
            .zip(maps)
            .zip(&split.units)
            .map(|((output, map), unit)| {
                if !self.options.preserve_punctuation
                    || map.is_empty()
                    || unit.is_terminator()
                    || removed(unit.index() + 1)
                {
                    output
                } else {
                    map.restore(&output, separator.word())
                }
            })
            .collect();

        let output = ResultAssembler::new(separator.clone(), self.config.options.strip)
            .assemble(restored, &split.shape);

        log::debug!(
            "phonemized {} units with {}",
            split.len(),
            self.backend_name
        );

        Ok(Transcription {
            output,
            language_switches,
        })
    }
}

/// Phonemize `text` in one call
///
/// Builds a [`Phonemizer`] for `backend` and `language`, so every
/// configuration error is reported before any transcription starts.
///
/// ```no_run
/// use phonoscribe_engine::{phonemize, Options};
///
/// let phonemes = phonemize("hello world", "en-us", "espeak", Options::default())?;
/// println!("{phonemes}");
/// # Ok::<(), phonoscribe_engine::PhonemizeError>(())
/// ```
pub fn phonemize(
    text: impl Into<Document>,
    language: &str,
    backend: &str,
    options: Options,
) -> Result<Document> {
    let config = PhonemizeConfig {
        backend: backend.to_string(),
        language: language.to_string(),
        options,
    };
    Phonemizer::new(config)?.phonemize(text)
}
