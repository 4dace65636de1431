//! Phonemizer configuration
//!
//! A configuration can be built in code with [`PhonemizeConfigBuilder`] or
//! loaded from TOML:
//!
//! ```toml
//! backend = "segments"
//! language = "esperanto"
//! strip = true
//! njobs = 4
//! preserve_punctuation = true
//!
//! [separator]
//! phone = "-"
//! word = " "
//! ```

use crate::backend::BackendKind;
use crate::error::ConfigError;
use crate::options::BackendOptions;
use phonoscribe_core::{LanguageSwitch, Punctuation, Separator};
use serde::Deserialize;
use std::path::Path;

/// Default configuration constants
pub mod defaults {
    /// Backend used when none is given
    pub const BACKEND: &str = "espeak";

    /// Language used when none is given
    pub const LANGUAGE: &str = "en-us";

    /// Worker count
    pub const NJOBS: usize = 1;
}

/// Per-call options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Drop the trailing word separator of every unit
    pub strip: bool,
    /// Keep stress marks
    pub with_stress: bool,
    /// Language switch policy
    pub language_switch: LanguageSwitch,
    /// Number of workers
    pub njobs: usize,
    /// Replacement punctuation set
    pub punctuation_marks: Option<String>,
    /// Restore punctuation in the output
    pub preserve_punctuation: bool,
    /// Output token separators
    pub separator: Separator,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strip: false,
            with_stress: false,
            language_switch: LanguageSwitch::default(),
            njobs: defaults::NJOBS,
            punctuation_marks: None,
            preserve_punctuation: false,
            separator: Separator::default(),
        }
    }
}

impl Options {
    /// Punctuation set in effect
    pub fn punctuation(&self) -> Result<Punctuation, ConfigError> {
        match &self.punctuation_marks {
            Some(marks) => Ok(Punctuation::new(marks)?),
            None => Ok(Punctuation::default()),
        }
    }

    /// Check option values independently of any backend
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.njobs == 0 {
            return Err(ConfigError::Invalid("njobs must be at least 1".to_string()));
        }

        self.separator.validate()?;
        let punctuation = self.punctuation()?;

        if self.preserve_punctuation {
            if let Some(mark) = punctuation
                .marks()
                .chars()
                .find(|&c| self.separator.contains_char(c))
            {
                return Err(ConfigError::Invalid(format!(
                    "punctuation mark '{mark}' is also used in separator {}",
                    self.separator
                )));
            }
        }

        Ok(())
    }

    /// Backend options for `language`
    pub fn backend_options(&self, language: &str) -> BackendOptions {
        BackendOptions {
            language: language.to_string(),
            separator: self.separator.clone(),
            with_stress: self.with_stress,
            language_switch: self.language_switch,
            preserve_punctuation: self.preserve_punctuation,
        }
    }
}

/// Complete phonemizer configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhonemizeConfig {
    /// Backend name
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Language or profile understood by the backend
    #[serde(default = "default_language")]
    pub language: String,
    /// Options
    #[serde(flatten)]
    pub options: Options,
}

fn default_backend() -> String {
    defaults::BACKEND.to_string()
}

fn default_language() -> String {
    defaults::LANGUAGE.to_string()
}

impl Default for PhonemizeConfig {
    fn default() -> Self {
        Self::new(defaults::BACKEND, defaults::LANGUAGE)
    }
}

impl PhonemizeConfig {
    /// Configuration with default options
    pub fn new(backend: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            language: language.into(),
            options: Options::default(),
        }
    }

    /// Create a builder
    pub fn builder() -> PhonemizeConfigBuilder {
        PhonemizeConfigBuilder::new()
    }

    /// Parsed backend name
    pub fn backend_kind(&self) -> Result<BackendKind, ConfigError> {
        self.backend.parse()
    }

    /// Check the configuration without probing any engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend_kind()?;
        if self.language.trim().is_empty() {
            return Err(ConfigError::Invalid("language must not be empty".to_string()));
        }
        self.options.validate()
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::File {
            path: "<string>".to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_error = |reason: String| ConfigError::File {
            path: path.display().to_string(),
            reason,
        };

        let source = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let config: Self = toml::from_str(&source).map_err(|e| file_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for PhonemizeConfig
#[derive(Debug, Default)]
pub struct PhonemizeConfigBuilder {
    config: PhonemizeConfig,
}

impl PhonemizeConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend
    pub fn backend<S: Into<String>>(mut self, backend: S) -> Self {
        self.config.backend = backend.into();
        self
    }

    /// Set the language
    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.config.language = language.into();
        self
    }

    /// Drop trailing word separators
    pub fn strip(mut self, strip: bool) -> Self {
        self.config.options.strip = strip;
        self
    }

    /// Keep stress marks
    pub fn with_stress(mut self, with_stress: bool) -> Self {
        self.config.options.with_stress = with_stress;
        self
    }

    /// Set the language switch policy
    pub fn language_switch(mut self, policy: LanguageSwitch) -> Self {
        self.config.options.language_switch = policy;
        self
    }

    /// Set the number of workers
    pub fn njobs(mut self, njobs: usize) -> Self {
        self.config.options.njobs = njobs;
        self
    }

    /// One worker per logical CPU
    pub fn all_cores(mut self) -> Self {
        self.config.options.njobs = num_cpus::get();
        self
    }

    /// Replace the punctuation set
    pub fn punctuation_marks<S: Into<String>>(mut self, marks: S) -> Self {
        self.config.options.punctuation_marks = Some(marks.into());
        self
    }

    /// Restore punctuation in the output
    pub fn preserve_punctuation(mut self, preserve: bool) -> Self {
        self.config.options.preserve_punctuation = preserve;
        self
    }

    /// Set the output separators
    pub fn separator(mut self, separator: Separator) -> Self {
        self.config.options.separator = separator;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<PhonemizeConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
