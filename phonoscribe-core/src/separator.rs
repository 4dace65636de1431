//! Token separators used when rendering phonemes

use crate::error::{CoreError, Result};
use std::fmt;

/// Default configuration constants
pub mod defaults {
    /// Phones are glued together by default
    pub const PHONE: &str = "";

    /// Syllables are glued together by default
    pub const SYLLABLE: &str = "";

    /// Words are separated by a single space
    pub const WORD: &str = " ";
}

/// Separators inserted between phones, syllables and words
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Separator {
    phone: String,
    syllable: String,
    word: String,
}

impl Default for Separator {
    fn default() -> Self {
        Self {
            phone: defaults::PHONE.to_string(),
            syllable: defaults::SYLLABLE.to_string(),
            word: defaults::WORD.to_string(),
        }
    }
}

impl Separator {
    /// Create a validated separator
    pub fn new(
        phone: impl Into<String>,
        syllable: impl Into<String>,
        word: impl Into<String>,
    ) -> Result<Self> {
        let separator = Self {
            phone: phone.into(),
            syllable: syllable.into(),
            word: word.into(),
        };
        separator.validate()?;
        Ok(separator)
    }

    /// Separator between phones
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Separator between syllables
    pub fn syllable(&self) -> &str {
        &self.syllable
    }

    /// Separator between words
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Check that non-empty tokens are pairwise distinct
    pub fn validate(&self) -> Result<()> {
        let tokens = [
            ("phone", &self.phone),
            ("syllable", &self.syllable),
            ("word", &self.word),
        ];

        for (i, (name_a, a)) in tokens.iter().enumerate() {
            if a.is_empty() {
                continue;
            }
            for (name_b, b) in &tokens[i + 1..] {
                if a == b {
                    return Err(CoreError::InvalidSeparator {
                        reason: format!("{name_a} and {name_b} separators are both '{a}'"),
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns true if `ch` appears in any separator token
    pub fn contains_char(&self, ch: char) -> bool {
        self.phone.contains(ch) || self.syllable.contains(ch) || self.word.contains(ch)
    }

    /// Remove trailing whitespace and trailing separator tokens
    pub fn trim_end<'a>(&self, text: &'a str) -> &'a str {
        let mut rest = text;
        loop {
            let before = rest.len();
            // Tokens may themselves end with whitespace (";eword ")
            for token in [&self.word, &self.syllable, &self.phone] {
                if !token.is_empty() {
                    if let Some(stripped) = rest.strip_suffix(token.as_str()) {
                        rest = stripped;
                    }
                }
            }
            rest = rest.trim_end();
            if rest.len() == before {
                return rest;
            }
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(phone: '{}', syllable: '{}', word: '{}')",
            self.phone, self.syllable, self.word
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separator() {
        let sep = Separator::default();
        assert_eq!(sep.phone(), "");
        assert_eq!(sep.syllable(), "");
        assert_eq!(sep.word(), " ");
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        let err = Separator::new("_", "", "_").unwrap_err();
        assert!(matches!(err, CoreError::InvalidSeparator { .. }));
        assert!(err.to_string().contains("phone and word"));
    }

    #[test]
    fn test_empty_tokens_may_repeat() {
        assert!(Separator::new("", "", " ").is_ok());
        assert!(Separator::new("", "", "").is_ok());
    }

    #[test]
    fn test_trim_end() {
        let sep = Separator::new("-", "|", " ").unwrap();
        assert_eq!(sep.trim_end("w-ʌ-n t-u- "), "w-ʌ-n t-u");
        assert_eq!(sep.trim_end("abc|  "), "abc");
        assert_eq!(sep.trim_end(""), "");
    }

    #[test]
    fn test_trim_end_token_with_trailing_space() {
        let sep = Separator::new(" ", ";esyll ", ";eword ").unwrap();
        assert_eq!(sep.trim_end("w ʌ n;eword t u;eword "), "w ʌ n;eword t u");
    }
}
