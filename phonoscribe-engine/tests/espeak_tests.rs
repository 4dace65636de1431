//! Tests against an installed espeak-ng, skipped when it is missing

mod common;

use common::init_logging;
use phonoscribe_engine::{
    BackendKind, Document, EngineProbe, LanguageSwitch, Options, PhonemizeConfig, Phonemizer,
    SystemProbe,
};

fn espeak_installed() -> bool {
    let installed = SystemProbe.probe(BackendKind::Espeak).is_some();
    if !installed {
        eprintln!("espeak-ng not found, skipping");
    }
    installed
}

fn espeak(options: Options) -> Phonemizer {
    Phonemizer::new(PhonemizeConfig {
        backend: "espeak".to_string(),
        language: "en-us".to_string(),
        options,
    })
    .unwrap()
}

#[test]
fn test_espeak_shape_and_strip() {
    init_logging();
    if !espeak_installed() {
        return;
    }

    let out = espeak(Options::default()).phonemize("hello\nworld\n").unwrap();
    let text = out.into_text().unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.split('\n').count(), 3);

    let stripped = espeak(Options {
        strip: true,
        ..Options::default()
    })
    .phonemize(vec!["hello world"])
    .unwrap();
    let line = &stripped.into_lines().unwrap()[0];
    assert!(!line.ends_with(' '));
    assert_eq!(line.split(' ').count(), 2);
}

#[test]
fn test_espeak_stress() {
    if !espeak_installed() {
        return;
    }

    let plain = espeak(Options::default()).phonemize("hello").unwrap();
    assert!(!plain.to_string().contains('ˈ'));

    let stressed = espeak(Options {
        with_stress: true,
        ..Options::default()
    })
    .phonemize("hello")
    .unwrap();
    assert!(stressed.to_string().contains('ˈ'));
}

#[test]
fn test_espeak_parallel_matches_sequential() {
    if !espeak_installed() {
        return;
    }

    let lines: Vec<String> = (0..12).map(|i| format!("line number {i}")).collect();
    let sequential = espeak(Options::default()).phonemize(lines.clone()).unwrap();
    let parallel = espeak(Options {
        njobs: 4,
        ..Options::default()
    })
    .phonemize(lines)
    .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_espeak_language_switch() {
    if !espeak_installed() {
        return;
    }

    let config = PhonemizeConfig {
        backend: "espeak".to_string(),
        language: "fr-fr".to_string(),
        options: Options {
            language_switch: LanguageSwitch::RemoveUtterance,
            ..Options::default()
        },
    };
    let Ok(phonemizer) = Phonemizer::new(config) else {
        eprintln!("french voice not installed, skipping");
        return;
    };

    let transcription = phonemizer
        .phonemize_with_report(vec!["j'aime le football", "bonjour"])
        .unwrap();
    if transcription.language_switches.is_empty() {
        // Older voices phonemize the word in French
        return;
    }
    assert_eq!(transcription.language_switches.lines().collect::<Vec<_>>(), vec![1]);
    assert_eq!(transcription.output.as_lines().unwrap()[0], "");
    assert_ne!(transcription.output, Document::from(vec!["", ""]));
}
