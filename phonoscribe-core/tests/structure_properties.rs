//! Property tests for the structure-preserving pipeline pieces

use phonoscribe_core::{split, Document, Punctuation, ResultAssembler, Separator, Shape};
use proptest::prelude::*;

/// Stand-in transcription: uppercase every word, trailing space like a real backend
fn fake_transcribe(text: &str) -> String {
    let words: Vec<String> = text.split_whitespace().map(str::to_uppercase).collect();
    if words.is_empty() {
        String::new()
    } else {
        format!("{} ", words.join(" "))
    }
}

fn run(doc: &Document, strip: bool) -> Document {
    let split = split(doc);
    let outputs = split
        .units
        .iter()
        .map(|unit| fake_transcribe(unit.text()))
        .collect();
    ResultAssembler::new(Separator::default(), strip).assemble(outputs, &split.shape)
}

fn line() -> impl Strategy<Value = String> {
    "[a-z]{1,6}( [a-z]{1,6}){0,4}"
}

proptest! {
    #[test]
    fn list_length_is_preserved(lines in prop::collection::vec(line(), 0..20)) {
        let out = run(&Document::from(lines.clone()), true);
        let out_lines = out.into_lines().expect("list in, list out");
        prop_assert_eq!(out_lines.len(), lines.len());
    }

    #[test]
    fn text_separator_is_preserved(lines in prop::collection::vec(line(), 1..20), crlf in any::<bool>()) {
        let sep = if crlf { "\r\n" } else { "\n" };
        let out = run(&Document::from(lines.join(sep)), true);
        let text = out.into_text().expect("text in, text out");
        prop_assert_eq!(text.split(sep).count(), lines.len());
    }

    #[test]
    fn strip_removes_exactly_one_separator(lines in prop::collection::vec(line(), 1..20)) {
        let doc = Document::from(lines);
        let kept = run(&doc, false).into_lines().unwrap();
        let stripped = run(&doc, true).into_lines().unwrap();
        for (k, s) in kept.iter().zip(stripped.iter()) {
            prop_assert_eq!(k, &format!("{s} "));
        }
    }

    #[test]
    fn punctuation_is_never_lost(
        text in "[a-z ,.!?;:]{0,40}",
        merged in any::<bool>(),
    ) {
        let punctuation = Punctuation::default();
        let (clean, map) = punctuation.strip(&text);
        prop_assert!(!clean.chars().any(|c| punctuation.is_mark(c)));

        // Simulate a backend that merges all words into a single group
        let phonemes = if merged {
            clean.replace(' ', "")
        } else {
            clean.clone()
        };
        let restored = map.restore(&phonemes, " ");

        let count = |s: &str| s.chars().filter(|&c| punctuation.is_mark(c)).count();
        prop_assert_eq!(count(&restored), count(&text));
    }
}

#[test]
fn test_trailing_line_break_survives() {
    let out = run(&Document::from("a\nb\n"), false);
    assert_eq!(out, Document::from("A \nB \n"));

    let out = run(&Document::from("a\nb\n"), true);
    assert!(out.as_text().unwrap().ends_with('\n'));
}

#[test]
fn test_shape_tags() {
    assert_eq!(split(&Document::from(vec!["x"])).shape, Shape::Lines);
    assert!(matches!(
        split(&Document::from("x")).shape,
        Shape::Text { .. }
    ));
}

#[test]
fn test_list_and_joined_text_agree() {
    let lines = vec!["one two", "three", "four five"];
    let as_list = run(&Document::from(lines.clone()), true);
    let as_text = run(&Document::from(lines.join("\n")), true);

    assert_eq!(as_list.into_lines().unwrap().join("\n"), as_text.into_text().unwrap());
}
