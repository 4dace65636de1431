//! espeak-ng backend

use super::{command, render_words, Backend, BackendKind};
use crate::error::BackendResult;
use crate::options::{BackendOptions, Feature};
use crate::probe::ProbeCache;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Primary and secondary stress marks
pub const STRESS_MARKS: [char; 2] = ['ˈ', 'ˌ'];

/// Phone separator espeak-ng uses with `--ipa=3`
const IPA_PHONE_SEPARATOR: char = '_';

/// Transcribes with `espeak-ng --ipa=3`, one call per unit
#[derive(Debug, Clone)]
pub struct EspeakBackend {
    probes: Arc<ProbeCache>,
}

impl EspeakBackend {
    /// Create a backend using `probes` for availability and voices
    pub fn new(probes: Arc<ProbeCache>) -> Self {
        Self { probes }
    }

    fn transcribe_one(&self, text: &str, options: &BackendOptions) -> BackendResult<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let output = command::run(
            &command::espeak_program(),
            &["-q", "--ipa=3", "-v", &options.language, "--stdin"],
            Some(text),
        )?;
        Ok(parse_ipa(&output, options))
    }
}

impl Backend for EspeakBackend {
    fn name(&self) -> &'static str {
        BackendKind::Espeak.name()
    }

    fn is_available(&self) -> bool {
        self.probes.info(BackendKind::Espeak).is_some()
    }

    fn supported_languages(&self) -> BTreeSet<String> {
        self.probes
            .info(BackendKind::Espeak)
            .map(|info| info.languages.clone())
            .unwrap_or_default()
    }

    fn supports_language(&self, language: &str) -> bool {
        self.probes
            .info(BackendKind::Espeak)
            .is_some_and(|info| info.languages.contains(language))
    }

    fn supports(&self, feature: Feature) -> bool {
        !matches!(feature, Feature::Syllables)
    }

    fn transcribe(
        &mut self,
        texts: &[String],
        options: &BackendOptions,
    ) -> BackendResult<Vec<String>> {
        self.check(options)?;
        texts
            .iter()
            .map(|text| self.transcribe_one(text, options))
            .collect()
    }
}

/// Convert `--ipa=3` output to separator-delimited phonemes
///
/// espeak-ng may break a unit over several output lines; they are read as a
/// single utterance. Language switch markers stay attached to the phone
/// they precede or follow.
pub fn parse_ipa(output: &str, options: &BackendOptions) -> String {
    let words = output.split_whitespace().map(|word| {
        let phones: Vec<String> = word
            .split(IPA_PHONE_SEPARATOR)
            .map(|phone| {
                if options.with_stress {
                    phone.to_string()
                } else {
                    phone.replace(STRESS_MARKS, "")
                }
            })
            .filter(|phone| !phone.is_empty())
            .collect();
        // espeak-ng does not report syllables
        std::iter::once(phones)
    });

    render_words(words, &options.separator)
}
