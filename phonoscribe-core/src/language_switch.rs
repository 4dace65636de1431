//! Language switch detection
//!
//! Rule-based synthesizers fall back to another language's phoneme set when
//! they meet a foreign word, and tag the span inline: `(en)fʊtbɔːl(fr)`. The
//! detector finds those tags, applies the caller's policy and reports the
//! affected lines once per run.

use crate::error::CoreError;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static MARKER: OnceLock<Regex> = OnceLock::new();

fn marker() -> &'static Regex {
    MARKER.get_or_init(|| {
        Regex::new(r"\([a-z]{2,3}(?:-[a-z0-9]+)*\)").expect("language marker pattern is valid")
    })
}

/// What to do with utterances containing language switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LanguageSwitch {
    /// Keep the markers, report the lines
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "keep-flags"))]
    Flag,
    /// Drop the markers, keep the foreign phonemes
    RemoveFlags,
    /// Replace the whole utterance with an empty string
    RemoveUtterance,
}

impl LanguageSwitch {
    /// Policy name as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageSwitch::Flag => "flag",
            LanguageSwitch::RemoveFlags => "remove-flags",
            LanguageSwitch::RemoveUtterance => "remove-utterance",
        }
    }
}

impl FromStr for LanguageSwitch {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flag" | "keep-flags" => Ok(LanguageSwitch::Flag),
            "remove-flags" => Ok(LanguageSwitch::RemoveFlags),
            "remove-utterance" => Ok(LanguageSwitch::RemoveUtterance),
            _ => Err(CoreError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for LanguageSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lines where a language switch was found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageSwitchReport {
    lines: BTreeSet<usize>,
    policy: LanguageSwitch,
}

impl LanguageSwitchReport {
    /// 1-based line numbers, ascending
    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }

    /// Number of affected utterances
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if no switch was found
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns true if 1-based `line` had a switch
    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Policy that was applied
    pub fn policy(&self) -> LanguageSwitch {
        self.policy
    }

    /// The consolidated diagnostic, `None` when nothing was detected
    pub fn message(&self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }

        let lines = self
            .lines
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let action = match self.policy {
            LanguageSwitch::Flag => "flags have been kept",
            LanguageSwitch::RemoveFlags => "flags have been removed, extra phones may appear",
            LanguageSwitch::RemoveUtterance => "utterances have been removed",
        };

        Some(format!(
            "{} utterances containing language switches on lines {lines}; {action} (applying \"{}\" policy)",
            self.lines.len(),
            self.policy
        ))
    }
}

/// Finds and handles inline language markers
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageSwitchDetector {
    policy: LanguageSwitch,
}

impl LanguageSwitchDetector {
    /// Create a detector applying `policy`
    pub fn new(policy: LanguageSwitch) -> Self {
        Self { policy }
    }

    /// Returns true if `text` carries a language marker
    pub fn has_switch(text: &str) -> bool {
        marker().is_match(text)
    }

    /// Apply the policy to every output and log one diagnostic for the batch
    pub fn scan(&self, outputs: Vec<String>) -> (Vec<String>, LanguageSwitchReport) {
        let mut lines = BTreeSet::new();

        let cleaned = outputs
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                if !Self::has_switch(&text) {
                    return text;
                }
                lines.insert(i + 1);
                match self.policy {
                    LanguageSwitch::Flag => text,
                    LanguageSwitch::RemoveFlags => marker().replace_all(&text, "").into_owned(),
                    LanguageSwitch::RemoveUtterance => String::new(),
                }
            })
            .collect();

        let report = LanguageSwitchReport {
            lines,
            policy: self.policy,
        };
        if let Some(message) = report.message() {
            log::warn!("{message}");
        }

        (cleaned, report)
    }
}
