//! Punctuation preservation
//!
//! Backends phonemize words and lose punctuation. Before transcription the
//! marks are stripped from each unit and recorded with the number of words
//! that precede them. After transcription they are put back at the matching
//! word boundary of the phoneme output.
//!
//! Backends do not always keep one phoneme token per input word (a rule-based
//! synthesizer happily merges "a cow" into a single group). A mark whose
//! boundary no longer exists goes to the end of the output: marks are never
//! dropped.

use crate::error::{CoreError, Result};
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// Marks preserved by default
pub const DEFAULT_MARKS: &str = ";:,.!?¡¿—…\"«»“”(){}[]";

/// Configurable set of punctuation characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Punctuation {
    marks: BTreeSet<char>,
}

impl Default for Punctuation {
    fn default() -> Self {
        Self {
            marks: DEFAULT_MARKS.chars().collect(),
        }
    }
}

impl Punctuation {
    /// Create a punctuation set from the characters of `marks`
    pub fn new(marks: &str) -> Result<Self> {
        if marks.is_empty() {
            return Err(CoreError::InvalidPunctuation {
                reason: "mark set is empty".to_string(),
            });
        }
        if marks.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidPunctuation {
                reason: "whitespace cannot be a punctuation mark".to_string(),
            });
        }

        Ok(Self {
            marks: marks.chars().collect(),
        })
    }

    /// The marks as a string, in code point order
    pub fn marks(&self) -> String {
        self.marks.iter().collect()
    }

    /// Returns true if `ch` is a punctuation mark
    #[inline]
    pub fn is_mark(&self, ch: char) -> bool {
        self.marks.contains(&ch)
    }

    /// Remove punctuation, returning the clean text alone
    pub fn remove(&self, text: &str) -> String {
        self.strip(text).0
    }

    /// Split `text` into punctuation-free words and a map of the removed marks
    pub fn strip(&self, text: &str) -> (String, PunctuationMap) {
        let chars: Vec<char> = text.chars().collect();
        let mut words: Vec<String> = Vec::new();
        let mut marks: SmallVec<[Mark; 4]> = SmallVec::new();
        let mut current = String::new();

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if self.is_mark(ch) {
                let space_before = i > 0 && chars[i - 1].is_whitespace();
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }

                // A run spans marks and inner whitespace, ending on a mark
                let mut end = i + 1;
                let mut j = i + 1;
                while j < chars.len() && (self.is_mark(chars[j]) || chars[j].is_whitespace()) {
                    if self.is_mark(chars[j]) {
                        end = j + 1;
                    }
                    j += 1;
                }

                marks.push(Mark {
                    anchor: words.len(),
                    text: chars[i..end].iter().collect(),
                    space_before,
                    space_after: end < chars.len() && chars[end].is_whitespace(),
                });
                i = end;
            } else if ch.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                i += 1;
            } else {
                current.push(ch);
                i += 1;
            }
        }

        if !current.is_empty() {
            words.push(current);
        }

        let map = PunctuationMap {
            marks,
            words: words.len(),
        };
        (words.join(" "), map)
    }
}

/// A punctuation run removed from a unit
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mark {
    /// Number of words before the run
    pub anchor: usize,
    /// The run itself, inner whitespace included
    pub text: String,
    /// Whitespace separated the run from the previous word
    pub space_before: bool,
    /// Whitespace separated the run from the next word
    pub space_after: bool,
}

/// Marks removed from one unit, in text order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PunctuationMap {
    marks: SmallVec<[Mark; 4]>,
    words: usize,
}

impl PunctuationMap {
    /// Recorded marks
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Number of words in the clean text
    pub fn word_count(&self) -> usize {
        self.words
    }

    /// Returns true if no mark was removed
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Re-insert the marks into phoneme output whose words are split by `word_separator`
    pub fn restore(&self, phonemes: &str, word_separator: &str) -> String {
        let phonemes = phonemes.trim();
        let tokens: Vec<&str> = if word_separator.is_empty() {
            if phonemes.is_empty() {
                Vec::new()
            } else {
                vec![phonemes]
            }
        } else {
            phonemes
                .split(word_separator)
                .filter(|token| !token.is_empty())
                .collect()
        };

        if self.marks.is_empty() {
            return tokens.join(word_separator);
        }

        let n = tokens.len();
        let mut slots: Vec<Vec<&Mark>> = vec![Vec::new(); n + 1];
        for mark in &self.marks {
            slots[self.slot(mark, n)].push(mark);
        }

        let mut out = String::new();
        for (slot, group) in slots.iter().enumerate() {
            if group.is_empty() {
                if slot > 0 && slot < n {
                    out.push_str(word_separator);
                }
            } else {
                for (k, mark) in group.iter().enumerate() {
                    let gap = if k == 0 {
                        slot > 0 && mark.space_before
                    } else {
                        group[k - 1].space_after || mark.space_before
                    };
                    if gap {
                        out.push_str(word_separator);
                    }
                    out.push_str(&mark.text);
                }
                if slot < n && group.last().is_some_and(|mark| mark.space_after) {
                    out.push_str(word_separator);
                }
            }

            if slot < n {
                out.push_str(tokens[slot]);
            }
        }

        out
    }

    /// Token boundary for a mark given `n` phoneme tokens
    fn slot(&self, mark: &Mark, n: usize) -> usize {
        if mark.anchor == 0 {
            0
        } else if mark.anchor >= self.words || mark.anchor >= n {
            n
        } else {
            mark.anchor
        }
    }
}
