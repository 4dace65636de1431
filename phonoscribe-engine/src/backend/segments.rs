//! Orthography profile backend
//!
//! Transcribes in process with a grapheme-to-phoneme table, so it needs no
//! external engine. Profiles are TOML files:
//!
//! ```toml
//! [metadata]
//! code = "epo"
//! name = "Esperanto"
//!
//! [graphemes]
//! a = "a"
//! "ĉ" = "tʃ"
//! x = "k s"
//! ```
//!
//! A grapheme maps to zero or more whitespace-separated phones. Words are
//! tokenized greedily, longest grapheme first.

use super::{render_words, Backend, BackendKind};
use crate::error::{BackendError, BackendResult};
use crate::options::{BackendOptions, Feature};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Profiles compiled into the crate
static EMBEDDED: OnceLock<HashMap<&'static str, Arc<Profile>>> = OnceLock::new();

fn embedded() -> &'static HashMap<&'static str, Arc<Profile>> {
    EMBEDDED.get_or_init(|| {
        let mut map = HashMap::new();

        for (name, source) in [
            ("yucatec", include_str!("../../profiles/yucatec.toml")),
            ("esperanto", include_str!("../../profiles/esperanto.toml")),
        ] {
            match Profile::from_toml_str(source, name) {
                Ok(profile) => {
                    map.insert(name, Arc::new(profile));
                }
                Err(e) => log::warn!("failed to load embedded profile {name}: {e}"),
            }
        }

        map
    })
}

/// Names of the embedded profiles
pub fn embedded_profiles() -> impl Iterator<Item = &'static str> {
    embedded().keys().copied()
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    metadata: Metadata,
    graphemes: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    code: String,
    name: String,
}

/// A grapheme-to-phoneme table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    code: String,
    name: String,
    graphemes: HashMap<String, Vec<String>>,
    longest: usize,
}

impl Profile {
    /// Parse a profile; `origin` names it in errors
    pub fn from_toml_str(source: &str, origin: &str) -> BackendResult<Self> {
        let error = |reason: String| BackendError::Profile {
            path: origin.to_string(),
            reason,
        };

        let file: ProfileFile = toml::from_str(source).map_err(|e| error(e.to_string()))?;
        if file.graphemes.is_empty() {
            return Err(error("no graphemes defined".to_string()));
        }

        let mut graphemes = HashMap::with_capacity(file.graphemes.len());
        let mut longest = 0;
        for (grapheme, phones) in file.graphemes {
            if grapheme.is_empty() {
                return Err(error("empty grapheme".to_string()));
            }
            let grapheme = grapheme.to_lowercase();
            longest = longest.max(grapheme.chars().count());
            graphemes.insert(
                grapheme,
                phones.split_whitespace().map(str::to_string).collect(),
            );
        }

        Ok(Self {
            code: file.metadata.code,
            name: file.metadata.name,
            graphemes,
            longest,
        })
    }

    /// Load a profile file
    pub fn from_file(path: &Path) -> BackendResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| BackendError::Profile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source, &path.display().to_string())
    }

    /// Language code from the profile metadata
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Language name from the profile metadata
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of graphemes
    pub fn len(&self) -> usize {
        self.graphemes.len()
    }

    /// Returns true if the profile has no grapheme
    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    /// Phones of `word`; characters matching no grapheme go to `unknown`
    pub fn tokenize(&self, word: &str, unknown: &mut BTreeSet<String>) -> Vec<&str> {
        let chars: Vec<char> = word.to_lowercase().chars().collect();
        let mut phones = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let longest = self.longest.min(chars.len() - i);
            let matched = (1..=longest).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                self.graphemes.get(&candidate).map(|p| (len, p))
            });

            match matched {
                Some((len, grapheme_phones)) => {
                    phones.extend(grapheme_phones.iter().map(String::as_str));
                    i += len;
                }
                None => {
                    unknown.insert(chars[i].to_string());
                    i += 1;
                }
            }
        }

        phones
    }
}

fn is_profile_path(language: &str) -> bool {
    let path = Path::new(language);
    path.extension().is_some_and(|ext| ext == "toml") && path.is_file()
}

/// Transcribes with an embedded profile or a profile file
#[derive(Debug, Clone, Default)]
pub struct SegmentsBackend {
    loaded: Option<(String, Arc<Profile>)>,
}

impl SegmentsBackend {
    /// Create a backend with no profile loaded yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile for `language`, loading it on first use
    pub fn profile(&mut self, language: &str) -> BackendResult<Arc<Profile>> {
        if let Some((name, profile)) = &self.loaded {
            if name == language {
                return Ok(Arc::clone(profile));
            }
        }

        let profile = match embedded().get(language) {
            Some(profile) => Arc::clone(profile),
            None => Arc::new(Profile::from_file(Path::new(language))?),
        };
        log::debug!(
            "loaded profile {} ({}) with {} graphemes",
            profile.name(),
            profile.code(),
            profile.len()
        );

        self.loaded = Some((language.to_string(), Arc::clone(&profile)));
        Ok(profile)
    }
}

impl Backend for SegmentsBackend {
    fn name(&self) -> &'static str {
        BackendKind::Segments.name()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn supported_languages(&self) -> BTreeSet<String> {
        embedded_profiles().map(str::to_string).collect()
    }

    fn supports_language(&self, language: &str) -> bool {
        embedded().contains_key(language) || is_profile_path(language)
    }

    fn supports(&self, feature: Feature) -> bool {
        matches!(feature, Feature::Punctuation)
    }

    fn prepare(&mut self, options: &BackendOptions) -> BackendResult<()> {
        self.profile(&options.language).map(|_| ())
    }

    fn transcribe(
        &mut self,
        texts: &[String],
        options: &BackendOptions,
    ) -> BackendResult<Vec<String>> {
        self.check(options)?;
        let profile = self.profile(&options.language)?;
        let mut unknown = BTreeSet::new();

        let outputs = texts
            .iter()
            .map(|text| {
                let words = text
                    .split_whitespace()
                    .map(|word| std::iter::once(profile.tokenize(word, &mut unknown)))
                    .collect::<Vec<_>>();
                render_words(words, &options.separator)
            })
            .collect();

        if !unknown.is_empty() {
            let graphemes: Vec<String> = unknown.into_iter().collect();
            log::warn!(
                "graphemes not in profile {} were skipped: {}",
                profile.name(),
                graphemes.join(" ")
            );
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonoscribe_core::Separator;

    fn transcribe(language: &str, texts: &[&str]) -> Vec<String> {
        let texts: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        SegmentsBackend::new()
            .transcribe(&texts, &BackendOptions::new(language))
            .unwrap()
    }

    #[test]
    fn test_embedded_profiles_load() {
        let names: BTreeSet<&str> = embedded_profiles().collect();
        assert!(names.contains("yucatec"));
        assert!(names.contains("esperanto"));
    }

    #[test]
    fn test_esperanto() {
        assert_eq!(
            transcribe("esperanto", &["ĉevalo", "Ĝis revido", ""]),
            vec!["tʃevalo ", "dʒis revido ", ""]
        );
    }

    #[test]
    fn test_x_system_matches_longest_grapheme() {
        assert_eq!(transcribe("esperanto", &["cxevalo"]), vec!["tʃevalo "]);
    }

    #[test]
    fn test_yucatec_glottal_consonants() {
        assert_eq!(transcribe("yucatec", &["k'áak'"]), vec!["kʼáːkʼ "]);
        assert_eq!(transcribe("yucatec", &["ts'o'ok"]), vec!["tsʼoʔok "]);
    }

    #[test]
    fn test_yucatec_modifier_letter_apostrophe() {
        assert_eq!(transcribe("yucatec", &["untuʼuleʼ"]), vec!["untuʔuleʔ "]);
        assert_eq!(
            transcribe("yucatec", &["kʼáakʼ tsʼoʼok"]),
            transcribe("yucatec", &["k'áak' ts'o'ok"])
        );
    }

    #[test]
    fn test_phone_separator() {
        let mut options = BackendOptions::new("esperanto");
        options.separator = Separator::new("-", "", " ").unwrap();
        let out = SegmentsBackend::new()
            .transcribe(&["ĉevalo".to_string()], &options)
            .unwrap();
        assert_eq!(out, vec!["tʃ-e-v-a-l-o "]);
    }

    #[test]
    fn test_unknown_graphemes_are_skipped() {
        assert_eq!(transcribe("esperanto", &["qa"]), vec!["a "]);
        assert_eq!(transcribe("esperanto", &["qqq"]), vec![""]);
    }

    #[test]
    fn test_profile_errors() {
        let err = Profile::from_toml_str("[metadata]\ncode = \"x\"\nname = \"x\"\n[graphemes]\n", "x")
            .unwrap_err();
        assert!(err.to_string().contains("no graphemes"));

        let err = Profile::from_toml_str("not toml at all", "broken").unwrap_err();
        assert!(matches!(err, BackendError::Profile { .. }));
    }

    #[test]
    fn test_unknown_language() {
        let mut backend = SegmentsBackend::new();
        assert!(!backend.supports_language("klingon"));
        let err = backend
            .transcribe(&["a".to_string()], &BackendOptions::new("klingon"))
            .unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedLanguage { .. }));
    }
}
