//! espeak-ng with mbrola voices
//!
//! espeak-ng's `--pho` mode prints the mbrola phoneme file for a text
//! instead of synthesizing it. Only the phone column is kept, so there is
//! no word or stress structure in the output.

use super::{command, Backend, BackendKind};
use crate::error::BackendResult;
use crate::options::{BackendOptions, Feature};
use crate::probe::ProbeCache;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Pause symbol in mbrola phoneme files
const PAUSE: &str = "_";

/// Transcribes with an mbrola voice (`mb-fr1`, `mb-us1`, ...)
#[derive(Debug, Clone)]
pub struct MbrolaBackend {
    probes: Arc<ProbeCache>,
}

impl MbrolaBackend {
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
            &["-q", "-v", &options.language, "--pho", "--stdin"],
            Some(text),
        )?;
        Ok(parse_pho(&output, options))
    }
}

impl Backend for MbrolaBackend {
    fn name(&self) -> &'static str {
        BackendKind::EspeakMbrola.name()
    }

    fn is_available(&self) -> bool {
        self.probes.info(BackendKind::EspeakMbrola).is_some()
    }

    fn supported_languages(&self) -> BTreeSet<String> {
        self.probes
            .info(BackendKind::EspeakMbrola)
            .map(|info| info.languages.clone())
            .unwrap_or_default()
    }

    fn supports(&self, _feature: Feature) -> bool {
        false
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

/// Phones from a `.pho` listing, joined by the phone separator
pub fn parse_pho(output: &str, options: &BackendOptions) -> String {
    let phones: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';'))
        .filter_map(|line| line.split_whitespace().next())
        .filter(|phone| *phone != PAUSE)
        .collect();

    if phones.is_empty() {
        return String::new();
    }
    format!(
        "{}{}",
        phones.join(options.separator.phone()),
        options.separator.word()
    )
}
