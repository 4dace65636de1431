//! Festival lexicon backend
//!
//! Every word of a chunk is looked up in one `festival --pipe` session with
//! `(lex.lookup "word" nil)`. Festival prints one entry per word:
//!
//! ```text
//! ("hello" nil (((hh ax) 0) ((l ow) 1)))
//! ```
//!
//! The third element lists syllables, each a list of phones and a stress
//! flag, which lets this backend honor the syllable separator.

use super::{command, render_words, Backend, BackendKind};
use crate::error::{BackendError, BackendResult};
use crate::options::{BackendOptions, Feature};
use crate::probe::ProbeCache;
use std::collections::BTreeSet;
use std::sync::Arc;

/// The only language festival is driven with
pub const LANGUAGE: &str = "en-us";

/// Transcribes with festival's lexicon and letter-to-sound rules
#[derive(Debug, Clone)]
pub struct FestivalBackend {
    probes: Arc<ProbeCache>,
}

impl FestivalBackend {
    /// Create a backend using `probes` for availability
    pub fn new(probes: Arc<ProbeCache>) -> Self {
        Self { probes }
    }
}

impl Backend for FestivalBackend {
    fn name(&self) -> &'static str {
        BackendKind::Festival.name()
    }

    fn is_available(&self) -> bool {
        self.probes.info(BackendKind::Festival).is_some()
    }

    fn supported_languages(&self) -> BTreeSet<String> {
        BTreeSet::from([LANGUAGE.to_string()])
    }

    fn supports(&self, feature: Feature) -> bool {
        matches!(feature, Feature::Syllables | Feature::Punctuation)
    }

    fn transcribe(
        &mut self,
        texts: &[String],
        options: &BackendOptions,
    ) -> BackendResult<Vec<String>> {
        self.check(options)?;

        let units: Vec<Vec<String>> = texts.iter().map(|text| words(text)).collect();
        let total: usize = units.iter().map(Vec::len).sum();
        if total == 0 {
            return Ok(vec![String::new(); texts.len()]);
        }

        let script = lookup_script(units.iter().flatten());
        let output = command::run(&command::festival_program(), &["--pipe"], Some(&script))?;
        let mut entries = parse_entries(&output)?.into_iter();

        let found = entries.len();
        if found != total {
            return Err(BackendError::Malformed {
                backend: self.name(),
                reason: format!("{found} lexicon entries for {total} words"),
            });
        }

        Ok(units
            .iter()
            .map(|unit| render_words(entries.by_ref().take(unit.len()), &options.separator))
            .collect())
    }
}

/// Words of a unit as festival should see them
fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !matches!(c, '"' | '\\'))
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Scheme program printing one lexicon entry per line
pub fn lookup_script<'a>(words: impl Iterator<Item = &'a String>) -> String {
    words
        .map(|word| format!("(format t \"%l\\n\" (lex.lookup \"{word}\" nil))\n"))
        .collect()
}

/// Phones of one syllable
pub type Syllable = Vec<String>;

/// Parse festival's printed entries into syllabified words
pub fn parse_entries(output: &str) -> BackendResult<Vec<Vec<Syllable>>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('('))
        .map(parse_entry)
        .collect()
}

fn parse_entry(line: &str) -> BackendResult<Vec<Syllable>> {
    let malformed = |reason: &str| BackendError::Malformed {
        backend: BackendKind::Festival.name(),
        reason: format!("{reason} in '{line}'"),
    };

    let entry = Sexp::parse(line).ok_or_else(|| malformed("unbalanced parentheses"))?;
    let syllables = entry
        .as_list()
        .and_then(|items| items.get(2))
        .and_then(Sexp::as_list)
        .ok_or_else(|| malformed("no syllable list"))?;

    syllables
        .iter()
        .map(|syllable| {
            let phones = syllable
                .as_list()
                .and_then(|parts| parts.first())
                .and_then(Sexp::as_list)
                .ok_or_else(|| malformed("syllable without phones"))?;
            phones
                .iter()
                .map(|phone| {
                    phone
                        .as_atom()
                        .map(str::to_string)
                        .ok_or_else(|| malformed("nested phone"))
                })
                .collect()
        })
        .collect()
}

/// Minimal s-expression tree for festival output
#[derive(Debug, Clone, PartialEq)]
enum Sexp {
    Atom(String),
    List(Vec<Sexp>),
}

impl Sexp {
    fn parse(input: &str) -> Option<Sexp> {
        let mut stack: Vec<Vec<Sexp>> = Vec::new();
        let mut chars = input.chars().peekable();
        let mut result = None;

        while let Some(c) = chars.next() {
            match c {
                '(' => stack.push(Vec::new()),
                ')' => {
                    let list = Sexp::List(stack.pop()?);
                    match stack.last_mut() {
                        Some(parent) => parent.push(list),
                        None => result = Some(list),
                    }
                }
                '"' => {
                    let mut atom = String::new();
                    for c in chars.by_ref() {
                        if c == '"' {
                            break;
                        }
                        atom.push(c);
                    }
                    stack.last_mut()?.push(Sexp::Atom(atom));
                }
                c if c.is_whitespace() => {}
                c => {
                    let mut atom = c.to_string();
                    while let Some(&next) = chars.peek() {
                        if next.is_whitespace() || next == '(' || next == ')' {
                            break;
                        }
                        atom.push(next);
                        chars.next();
                    }
                    stack.last_mut()?.push(Sexp::Atom(atom));
                }
            }
        }

        if stack.is_empty() {
            result
        } else {
            None
        }
    }

    fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::List(items) => Some(items),
            Sexp::Atom(_) => None,
        }
    }

    fn as_atom(&self) -> Option<&str> {
        match self {
            Sexp::Atom(atom) => Some(atom),
            Sexp::List(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phonoscribe_core::Separator;

    const OUTPUT: &str = "\
(\"hello\" nil (((hh ax) 0) ((l ow) 1)))
(\"world\" nil (((w er l d) 1)))
";

    #[test]
    fn test_parse_entries() {
        let entries = parse_entries(OUTPUT).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], vec![vec!["hh", "ax"], vec!["l", "ow"]]);
        assert_eq!(entries[1], vec![vec!["w", "er", "l", "d"]]);
    }

    #[test]
    fn test_render_syllables() {
        let separator = Separator::new(" ", ";esyll ", ";eword ").unwrap();
        let entries = parse_entries(OUTPUT).unwrap();
        assert_eq!(
            render_words(entries, &separator),
            "hh ax;esyll l ow;eword w er l d;eword "
        );
    }

    #[test]
    fn test_malformed_entry() {
        let err = parse_entries("(\"hello\" nil\n").unwrap_err();
        assert!(matches!(err, BackendError::Malformed { .. }));

        let err = parse_entries("(\"hello\" nil)\n").unwrap_err();
        assert!(err.to_string().contains("no syllable list"));
    }

    #[test]
    fn test_lookup_script_quotes_words() {
        let words = words("Hello \"World\"");
        assert_eq!(words, vec!["hello", "world"]);
        let script = lookup_script(words.iter());
        assert_eq!(
            script.lines().next(),
            Some("(format t \"%l\\n\" (lex.lookup \"hello\" nil))")
        );
    }

    #[test]
    fn test_blank_units_skip_festival() {
        let mut backend = FestivalBackend::new(Arc::new(ProbeCache::new(
            crate::probe::StaticProbe::new(),
        )));
        let out = backend
            .transcribe(&["".to_string(), "  ".to_string()], &BackendOptions::new(LANGUAGE))
            .unwrap();
        assert_eq!(out, vec!["", ""]);
    }

    #[test]
    fn test_capabilities() {
        let backend = FestivalBackend::new(Arc::new(ProbeCache::new(
            crate::probe::StaticProbe::new(),
        )));
        assert!(backend.supports(Feature::Syllables));
        assert!(!backend.supports(Feature::Stress));
        assert!(!backend.supports(Feature::LanguageSwitch));
        assert!(backend.supports_language("en-us"));
        assert!(!backend.supports_language("fr-fr"));
    }
}
