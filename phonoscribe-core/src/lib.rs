//! Structure-preserving building blocks for phonemization
//!
//! Grapheme-to-phoneme engines are good at turning words into phonemes and
//! bad at keeping everything around the words: line breaks, trailing
//! separators, punctuation. This crate holds the pure, deterministic pieces
//! of a phonemization pipeline that take care of that:
//!
//! - [`document`]: splitting input into units and remembering its shape
//! - [`punctuation`]: stripping marks before transcription, restoring them after
//! - [`language_switch`]: detecting foreign-language spans in backend output
//! - [`assembler`]: rebuilding output in the shape of the input
//!
//! # Example
//!
//! ```rust
//! use phonoscribe_core::{document, Document, Punctuation, ResultAssembler, Separator};
//!
//! let doc = Document::from("hello, world!\n");
//! let split = document::split(&doc);
//! let punctuation = Punctuation::default();
//!
//! let outputs: Vec<String> = split
//!     .units
//!     .iter()
//!     .map(|unit| {
//!         let (clean, map) = punctuation.strip(unit.text());
//!         // A real backend would transcribe `clean` here
//!         map.restore(&clean.to_uppercase(), " ")
//!     })
//!     .collect();
//!
//! let assembler = ResultAssembler::new(Separator::default(), true);
//! let output = assembler.assemble(outputs, &split.shape);
//! assert_eq!(output, Document::from("HELLO, WORLD!\n"));
//! ```

#![warn(missing_docs)]

pub mod assembler;
pub mod document;
pub mod error;
pub mod language_switch;
pub mod punctuation;
pub mod separator;

// Re-export key types
pub use assembler::ResultAssembler;
pub use document::{split, Document, Shape, SplitDocument, Unit};
pub use error::{CoreError, Result};
pub use language_switch::{LanguageSwitch, LanguageSwitchDetector, LanguageSwitchReport};
pub use punctuation::{Mark, Punctuation, PunctuationMap};
pub use separator::Separator;
