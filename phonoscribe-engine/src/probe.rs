//! Engine availability probing
//!
//! Whether an engine is installed, its version and the voices it offers are
//! looked up lazily, once per [`ProbeCache`]. A phonemizer owns its cache, so
//! nothing here is process-global and tests can inject a [`StaticProbe`].

use crate::backend::command;
use crate::backend::BackendKind;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

/// Directories searched for installed mbrola voice databases
pub const MBROLA_DIRS: &[&str] = &[
    "/usr/share/mbrola",
    "/usr/local/share/mbrola",
    "/opt/homebrew/share/mbrola",
];

/// What is known about an installed engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    /// Version string reported by the engine
    pub version: String,
    /// Language or voice codes the engine accepts
    pub languages: BTreeSet<String>,
}

impl EngineInfo {
    /// Create engine info from a version and language codes
    pub fn new<I, S>(version: impl Into<String>, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version: version.into(),
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Source of engine information
pub trait EngineProbe: Send + Sync {
    /// Inspect an engine, `None` when it is not installed
    fn probe(&self, kind: BackendKind) -> Option<EngineInfo>;
}

/// Probes the engines installed on this machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl EngineProbe for SystemProbe {
    fn probe(&self, kind: BackendKind) -> Option<EngineInfo> {
        let info = match kind {
            BackendKind::Espeak => probe_espeak(),
            BackendKind::EspeakMbrola => probe_mbrola(),
            BackendKind::Festival => probe_festival(),
            BackendKind::Segments => None,
        };

        match &info {
            Some(info) => log::debug!(
                "{kind} {} found with {} languages",
                info.version,
                info.languages.len()
            ),
            None => log::debug!("{kind} not found"),
        }
        info
    }
}

fn probe_espeak() -> Option<EngineInfo> {
    let program = command::espeak_program();
    let version = parse_version(&command::run(&program, &["--version"], None).ok()?)?;
    let voices = command::run(&program, &["--voices"], None).ok()?;
    Some(EngineInfo {
        version,
        languages: parse_voices(&voices),
    })
}

fn probe_mbrola() -> Option<EngineInfo> {
    if !command::is_installed(&command::mbrola_program(), &["-h"]) {
        return None;
    }

    let program = command::espeak_program();
    let version = parse_version(&command::run(&program, &["--version"], None).ok()?)?;
    let voices = command::run(&program, &["--voices=mb"], None).ok()?;
    let languages = parse_mbrola_voices(&voices)
        .into_iter()
        .filter(|voice| mbrola_voice_installed(voice))
        .collect();

    Some(EngineInfo { version, languages })
}

fn probe_festival() -> Option<EngineInfo> {
    let output = command::run(&command::festival_program(), &["--version"], None).ok()?;
    Some(EngineInfo::new(parse_version(&output)?, ["en-us"]))
}

fn mbrola_voice_installed(voice: &str) -> bool {
    let id = voice.strip_prefix("mb-").unwrap_or(voice);
    MBROLA_DIRS
        .iter()
        .any(|dir| Path::new(dir).join(id).exists())
}

/// First dotted version number in `output`
pub fn parse_version(output: &str) -> Option<String> {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let pattern = VERSION
        .get_or_init(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").expect("version pattern is valid"));
    pattern.find(output).map(|m| m.as_str().to_string())
}

/// Language codes from an `espeak-ng --voices` table
pub fn parse_voices(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// Voice identifiers (`mb-fr1`) from an `espeak-ng --voices=mb` table
pub fn parse_mbrola_voices(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(4))
        .filter_map(|file| file.rsplit('/').next())
        .filter(|voice| voice.starts_with("mb-"))
        .map(str::to_string)
        .collect()
}

/// Fixed engine information, for tests and sandboxed environments
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    engines: HashMap<BackendKind, EngineInfo>,
}

impl StaticProbe {
    /// A probe reporting no installed engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `kind` as installed with `info`
    pub fn with(mut self, kind: BackendKind, info: EngineInfo) -> Self {
        self.engines.insert(kind, info);
        self
    }
}

impl EngineProbe for StaticProbe {
    fn probe(&self, kind: BackendKind) -> Option<EngineInfo> {
        self.engines.get(&kind).cloned()
    }
}

/// Memoized engine lookups, one probe call per engine at most
pub struct ProbeCache {
    probe: Box<dyn EngineProbe>,
    espeak: OnceLock<Option<EngineInfo>>,
    mbrola: OnceLock<Option<EngineInfo>>,
    festival: OnceLock<Option<EngineInfo>>,
}

impl std::fmt::Debug for ProbeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeCache")
            .field("espeak", &self.espeak.get())
            .field("mbrola", &self.mbrola.get())
            .field("festival", &self.festival.get())
            .finish()
    }
}

impl ProbeCache {
    /// Create a cache over `probe`
    pub fn new(probe: impl EngineProbe + 'static) -> Self {
        Self {
            probe: Box::new(probe),
            espeak: OnceLock::new(),
            mbrola: OnceLock::new(),
            festival: OnceLock::new(),
        }
    }

    /// Engine info for `kind`, probing on first access
    pub fn info(&self, kind: BackendKind) -> Option<&EngineInfo> {
        let slot = match kind {
            BackendKind::Espeak => &self.espeak,
            BackendKind::EspeakMbrola => &self.mbrola,
            BackendKind::Festival => &self.festival,
            BackendKind::Segments => return None,
        };
        slot.get_or_init(|| self.probe.probe(kind)).as_ref()
    }
}

impl Default for ProbeCache {
    fn default() -> Self {
        Self::new(SystemProbe)
    }
}
