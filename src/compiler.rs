//! # Corpus Compiler
//!
//! Merges per-document sentence files into a single training corpus.
//!
//! Files are read in sorted filename order and lines are kept in traversal
//! order. A line survives when it is not blocked, is long enough, has not been
//! seen earlier in the run and mentions at least one domain keyword.

use crate::error::{Error, Result};
use crate::repair::fix_mojibake;
use crate::storage;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Wildfire, remote-sensing and biome vocabulary.
pub const DEFAULT_DOMAIN_KEYWORDS: &[&str] = &[
    // Fire
    "queimada",
    "incêndio",
    "fogo",
    "foco de calor",
    "focos",
    "chamas",
    "ignição",
    "combustão",
    // Remote sensing
    "satélite",
    "monitoramento",
    "sensor",
    "detecção",
    "inpe",
    "deter",
    "prodes",
    "terrabrasilis",
    "mapbiomas",
    "nasa",
    "aqua",
    "terra",
    "noaa",
    "goes",
    "viirs",
    "modis",
    "bdqueimadas",
    // Biomes
    "amazônia",
    "cerrado",
    "pantanal",
    "mata atlântica",
    "caatinga",
    "pampa",
    "bioma",
    "floresta",
    "vegetação",
];

/// Lines shorter than this (in characters) are dropped.
pub const DEFAULT_MIN_LENGTH: usize = 20;

/// Markers of dashboard residue that must never reach the corpus.
pub const DEFAULT_BLOCKED_MARKERS: &[&str] = &["vide linha"];

/// Case-insensitive substring keyword matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainKeywords {
    keywords: Vec<String>,
}

impl DomainKeywords {
    /// Builds a matcher; keywords are lowercased and blanks dropped.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Loads a newline-separated keyword file. Lines starting with `#` are comments.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = storage::read_text(path)?;
        Ok(Self::new(
            text.lines().filter(|line| !line.trim_start().starts_with('#')),
        ))
    }

    /// Returns true if any keyword occurs in the text, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Keywords in match order.
    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for DomainKeywords {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_KEYWORDS)
    }
}

/// Compiler configuration.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Relevance vocabulary
    pub keywords: DomainKeywords,
    /// Minimum line length in characters
    pub min_length: usize,
    /// Lines containing any of these (case-insensitive) are dropped
    pub blocked_markers: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            keywords: DomainKeywords::default(),
            min_length: DEFAULT_MIN_LENGTH,
            blocked_markers: DEFAULT_BLOCKED_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl CompileOptions {
    /// Replaces the keyword vocabulary.
    pub fn with_keywords(mut self, keywords: DomainKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Sets the minimum line length.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Adds a blocked marker.
    pub fn with_blocked_marker(mut self, marker: impl Into<String>) -> Self {
        self.blocked_markers.push(marker.into());
        self
    }

    fn is_blocked(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.blocked_markers
            .iter()
            .any(|m| lower.contains(&m.to_lowercase()))
    }
}

/// Why a line did not make it into the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    Kept,
    Blocked,
    TooShort,
    Duplicate,
    Irrelevant,
}

/// Run-local accumulator: dedup set, kept sentences and counters.
#[derive(Debug, Default)]
pub struct CompileState {
    seen: HashSet<String>,
    sentences: Vec<String>,
    /// Lines without any domain keyword
    pub discarded: usize,
    /// Lines under the minimum length
    pub too_short: usize,
    /// Lines already kept earlier in the run
    pub duplicates: usize,
    /// Lines containing a blocked marker
    pub blocked: usize,
}

impl CompileState {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one raw line and keeps it if it qualifies.
    pub fn push_line(&mut self, raw: &str, options: &CompileOptions) -> LineVerdict {
        let line = fix_mojibake(raw.trim());

        if options.is_blocked(&line) {
            self.blocked += 1;
            return LineVerdict::Blocked;
        }
        if line.chars().count() < options.min_length {
            self.too_short += 1;
            return LineVerdict::TooShort;
        }
        if self.seen.contains(&line) {
            self.duplicates += 1;
            return LineVerdict::Duplicate;
        }
        if !options.keywords.matches(&line) {
            self.discarded += 1;
            return LineVerdict::Irrelevant;
        }

        self.seen.insert(line.clone());
        self.sentences.push(line);
        LineVerdict::Kept
    }

    /// Kept sentences in traversal order.
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    /// Consumes the state, returning the kept sentences.
    pub fn into_sentences(self) -> Vec<String> {
        self.sentences
    }

    /// Whitespace-delimited words across kept sentences.
    pub fn word_count(&self) -> usize {
        self.sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum()
    }
}

/// Folds the lines of one in-memory file into the state.
pub fn compile_lines<'a, I>(state: &mut CompileState, lines: I, options: &CompileOptions)
where
    I: IntoIterator<Item = &'a str>,
{
    for line in lines {
        state.push_line(line, options);
    }
}

/// Summary of a compile run.
#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    /// Sentence files read
    pub files_processed: usize,
    /// Sentence files that could not be read
    pub unreadable_files: usize,
    /// Lines without any domain keyword
    pub discarded: usize,
    /// Lines under the minimum length
    pub too_short: usize,
    /// Repeated lines
    pub duplicates: usize,
    /// Lines with a blocked marker
    pub blocked: usize,
    /// Sentences written
    pub kept: usize,
    /// Words written
    pub word_count: usize,
    /// Corpus path
    pub output: PathBuf,
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(40);
        writeln!(f, "{}", rule)?;
        writeln!(f, "CORPUS COMPILATION REPORT")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Files processed:     {}", self.files_processed)?;
        writeln!(f, "Sentences discarded: {}", self.discarded)?;
        writeln!(f, "Sentences kept:      {}", self.kept)?;
        writeln!(f, "Total words:         {}", self.word_count)?;
        writeln!(f, "Saved to:            {}", self.output.display())?;
        write!(f, "{}", rule)
    }
}

/// Lists `.txt` files in `dir`, sorted by file name.
pub fn list_sentence_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::MissingInput(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_output_file(path: &Path, output_canonical: Option<&Path>) -> bool {
    match output_canonical {
        Some(output) => fs::canonicalize(path).is_ok_and(|p| p == output),
        None => false,
    }
}

/// Compiles every sentence file in `input_dir` into `output`.
///
/// # Example
///
/// ```no_run
/// use descreve::compiler::{compile, CompileOptions};
///
/// let report = compile("data/04_training_corpus", "data/final/corpus.txt", &CompileOptions::default())?;
/// println!("{}", report);
/// # Ok::<(), descreve::Error>(())
/// ```
pub fn compile(
    input_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<CompileReport> {
    let input_dir = input_dir.as_ref();
    let output = output.as_ref();

    let files = list_sentence_files(input_dir).inspect_err(|_| {
        error!(dir = %input_dir.display(), "input directory not found");
    })?;
    info!(dir = %input_dir.display(), files = files.len(), "compiling corpus");

    // A previous run may have left the output inside the input directory.
    let output_canonical = fs::canonicalize(output).ok();

    let mut state = CompileState::new();
    let mut files_processed = 0;
    let mut unreadable_files = 0;

    for path in &files {
        if path == output || is_output_file(path, output_canonical.as_deref()) {
            continue;
        }
        match fs::read_to_string(path) {
            Ok(text) => {
                compile_lines(&mut state, text.lines(), options);
                files_processed += 1;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read sentence file");
                unreadable_files += 1;
            }
        }
    }

    storage::write_lines(output, state.sentences())?;

    let report = CompileReport {
        files_processed,
        unreadable_files,
        discarded: state.discarded,
        too_short: state.too_short,
        duplicates: state.duplicates,
        blocked: state.blocked,
        kept: state.sentences().len(),
        word_count: state.word_count(),
        output: output.to_path_buf(),
    };
    info!(
        kept = report.kept,
        discarded = report.discarded,
        words = report.word_count,
        "corpus written to {}",
        output.display()
    );
    Ok(report)
}
