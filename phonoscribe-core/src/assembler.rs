//! Result assembly
//!
//! Backends disagree on whether a transcription ends with a word separator.
//! The assembler normalizes every unit the same way and rebuilds the shape
//! of the original document.

use crate::document::{Document, Shape};
use crate::separator::Separator;

/// Rebuilds document-shaped output from per-unit phonemes
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    separator: Separator,
    strip: bool,
}

impl ResultAssembler {
    /// Create an assembler; `strip` removes the trailing word separator
    pub fn new(separator: Separator, strip: bool) -> Self {
        Self { separator, strip }
    }

    /// Normalize one unit: exactly one trailing word separator, or none when stripping
    pub fn normalize(&self, output: &str) -> String {
        let trimmed = self.separator.trim_end(output);
        if self.strip || trimmed.is_empty() {
            trimmed.to_string()
        } else {
            format!("{trimmed}{}", self.separator.word())
        }
    }

    /// Assemble unit outputs into the shape of the input
    pub fn assemble(&self, outputs: Vec<String>, shape: &Shape) -> Document {
        let normalized = outputs.iter().map(|output| self.normalize(output));

        match shape {
            Shape::Lines => Document::Lines(normalized.collect()),
            Shape::Text { breaks } => {
                let mut text = String::new();
                let mut breaks = breaks.iter();
                for (i, unit) in normalized.enumerate() {
                    if i > 0 {
                        text.push_str(breaks.next().map_or("\n", String::as_str));
                    }
                    text.push_str(&unit);
                }
                Document::Text(text)
            }
        }
    }
}
