//! Shared test backends
#![allow(dead_code)]

use phonoscribe_engine::{Backend, BackendError, BackendOptions, BackendResult, Feature};
use std::collections::BTreeSet;

/// Lexicon lookups, unknown words are spelled out letter by letter
const LEXICON: &[(&str, &str)] = &[
    ("hello", "həloʊ"),
    ("world", "wɜːld"),
    ("one", "wʌn"),
    ("two", "tuː"),
    ("three", "θɹiː"),
    ("a", "ə"),
    ("b", "biː"),
    ("j'aime", "ʒɛm"),
    ("le", "lə"),
    ("moi", "mwa"),
    ("aussi", "osi"),
    ("football", "(en)fʊtbɔːl(fr)"),
];

/// In-process backend with a tiny lexicon
#[derive(Debug, Clone)]
pub struct FakeBackend {
    pub features: Vec<Feature>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            features: vec![Feature::LanguageSwitch, Feature::Punctuation],
        }
    }
}

impl FakeBackend {
    pub fn with_features(features: &[Feature]) -> Self {
        Self {
            features: features.to_vec(),
        }
    }

    fn word(word: &str) -> String {
        let word = word.to_lowercase();
        LEXICON
            .iter()
            .find(|(w, _)| *w == word)
            .map(|(_, p)| p.to_string())
            .unwrap_or(word)
    }
}

impl Backend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn supported_languages(&self) -> BTreeSet<String> {
        ["en-us".to_string(), "fr-fr".to_string()].into()
    }

    fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    fn transcribe(
        &mut self,
        texts: &[String],
        options: &BackendOptions,
    ) -> BackendResult<Vec<String>> {
        self.check(options)?;
        Ok(texts
            .iter()
            .map(|text| {
                text.split_whitespace()
                    .map(|word| format!("{}{}", Self::word(word), options.separator.word()))
                    .collect()
            })
            .collect())
    }
}

/// Fails on any unit containing "crash"
#[derive(Debug, Clone, Default)]
pub struct CrashingBackend;

impl Backend for CrashingBackend {
    fn name(&self) -> &'static str {
        "crashing"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn supported_languages(&self) -> BTreeSet<String> {
        ["en-us".to_string()].into()
    }

    fn supports(&self, _feature: Feature) -> bool {
        false
    }

    fn transcribe(
        &mut self,
        texts: &[String],
        _options: &BackendOptions,
    ) -> BackendResult<Vec<String>> {
        if texts.iter().any(|text| text.contains("crash")) {
            return Err(BackendError::Failed {
                program: "crashing".to_string(),
                status: "signal: 11 (SIGSEGV)".to_string(),
                stderr: String::new(),
            });
        }
        Ok(texts.to_vec())
    }
}

pub fn fake_factory() -> impl Fn() -> BackendResult<Box<dyn Backend>> + Send + Sync {
    || Ok(Box::new(FakeBackend::default()) as Box<dyn Backend>)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
