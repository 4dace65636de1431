//! Options handed to backends

use phonoscribe_core::{LanguageSwitch, Separator};
use smallvec::SmallVec;
use std::fmt;

/// Optional capability a backend may or may not have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Stress marks in the output (`with_stress`)
    Stress,
    /// A language switch policy other than `flag`
    LanguageSwitch,
    /// A non-empty syllable separator
    Syllables,
    /// Punctuation restoration (`preserve_punctuation`)
    Punctuation,
}

impl Feature {
    /// Option name as the caller spells it
    pub fn option_name(&self) -> &'static str {
        match self {
            Feature::Stress => "with_stress",
            Feature::LanguageSwitch => "language_switch",
            Feature::Syllables => "separator.syllable",
            Feature::Punctuation => "preserve_punctuation",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// Everything a backend needs to transcribe a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOptions {
    /// Backend-specific language or voice identifier
    pub language: String,
    /// Output token separators
    pub separator: Separator,
    /// Keep stress marks
    pub with_stress: bool,
    /// Language switch policy
    pub language_switch: LanguageSwitch,
    /// Punctuation is restored after transcription
    pub preserve_punctuation: bool,
}

impl BackendOptions {
    /// Options with defaults for `language`
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            separator: Separator::default(),
            with_stress: false,
            language_switch: LanguageSwitch::default(),
            preserve_punctuation: false,
        }
    }

    /// Features these options require from a backend
    pub fn requested_features(&self) -> SmallVec<[Feature; 4]> {
        let mut features = SmallVec::new();
        if self.with_stress {
            features.push(Feature::Stress);
        }
        if self.language_switch != LanguageSwitch::Flag {
            features.push(Feature::LanguageSwitch);
        }
        if !self.separator.syllable().is_empty() {
            features.push(Feature::Syllables);
        }
        if self.preserve_punctuation {
            features.push(Feature::Punctuation);
        }
        features
    }
}
