//! Narrative line classification.
//!
//! [`is_narrative`] decides whether a single line reads like running prose.
//! [`LineFilter`] applies line-level drop rules to a whole document before
//! normalization collapses its line structure.

use crate::repair::mojibake_marker_count;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Lines opening with a caption keyword.
static CAPTION_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Figura|Tabela|Quadro|Fonte:|Lista dos?|Foto:)\s+").unwrap()
});

/// Reference-list vocabulary that betrays an English bibliography line.
const ENGLISH_REFERENCE_KEYWORDS: &[&str] = &[
    "journal",
    "nature",
    "science",
    "research",
    "vol.",
    "pp.",
    "doi:",
    "university",
];

/// Maximum share of digits in a narrative line.
const MAX_DIGIT_RATIO: f64 = 0.40;

/// Minimum number of whitespace-delimited words in a narrative line.
const MIN_WORDS: usize = 4;

/// Mojibake markers tolerated before a line is considered garbage.
const MAX_MOJIBAKE_MARKERS: usize = 3;

/// Returns true if the line looks like body prose.
///
/// Checks run in order and short-circuit: empty, caption opener, heavy
/// mojibake, English reference keywords, digit ratio, word count.
///
/// # Example
///
/// ```
/// use descreve::narrative::is_narrative;
///
/// assert!(is_narrative("Os focos de calor aumentaram no Pantanal."));
/// assert!(!is_narrative("Figura 3 - Focos por bioma"));
/// ```
pub fn is_narrative(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }

    if CAPTION_OPENER.is_match(line) {
        return false;
    }

    if mojibake_marker_count(line) > MAX_MOJIBAKE_MARKERS {
        return false;
    }

    let lower = line.to_lowercase();
    let english_hits = ENGLISH_REFERENCE_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();
    if english_hits >= 2 {
        return false;
    }

    let total = line.chars().count();
    let digits = line.chars().filter(char::is_ascii_digit).count();
    if digits as f64 / total as f64 > MAX_DIGIT_RATIO {
        return false;
    }

    line.split_whitespace().count() >= MIN_WORDS
}

// ============================================================================
// Line filter
// ============================================================================

static BIBLIOGRAPHIC_METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Acesso em:|Disponível em:|\bv\.\s*\d+|\bn\.\s*\d+|\bp\.\s*\d+|Vol\.\s*\d+|Revista|Journal|In:\s+[A-Z]|et al\.",
    )
    .unwrap()
});

/// All-caps author list ending in a period or comma: "SILVA, J. A.;  SOUZA, M."
static AUTHOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZÀ-Ú.\s,;-]{4,}[.,]$").unwrap());

static ASCII_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]+\b").unwrap());

/// Citation-shaped lines left over in scraped web pages.
static WEB_CITATION_LINES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"^[A-ZÁÉÍÓÚÇ\s]{3,},.*", r"^\d{4}\.", r"^Vol\.\s?\d+"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

static ENGLISH_STOPS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "and", "of", "to", "in", "is", "that", "for", "by", "with", "as", "on", "at",
        "from", "this", "are", "which", "or", "an", "be", "we", "our", "abstract",
        "introduction", "results", "discussion",
    ]
    .into_iter()
    .collect()
});

static PORTUGUESE_STOPS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "o", "a", "os", "as", "de", "do", "da", "em", "que", "e", "para", "com", "não", "uma",
        "um", "por", "mais", "dos", "das", "se", "resumo", "introdução", "resultados",
        "discussão",
    ]
    .into_iter()
    .collect()
});

/// Which line-drop rules a [`LineFilter`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFilterMode {
    /// Short lines, bibliographic metadata, author lines, resolutions and
    /// English-dominated lines (PDF text).
    #[default]
    Full,
    /// Citation-shaped lines only (web text).
    Citations,
}

/// Document-level line filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFilter {
    mode: LineFilterMode,
}

impl LineFilter {
    /// Creates a filter with the given mode.
    pub fn new(mode: LineFilterMode) -> Self {
        Self { mode }
    }

    /// Filter for PDF text.
    pub fn full() -> Self {
        Self::new(LineFilterMode::Full)
    }

    /// Filter for web text.
    pub fn citations() -> Self {
        Self::new(LineFilterMode::Citations)
    }

    /// Active mode.
    pub fn mode(&self) -> LineFilterMode {
        self.mode
    }

    /// Returns true if the line should be kept.
    pub fn keeps(&self, line: &str) -> bool {
        match self.mode {
            LineFilterMode::Full => keeps_content_line(line.trim()),
            LineFilterMode::Citations => {
                let line = line.trim();
                !WEB_CITATION_LINES.iter().any(|re| re.is_match(line))
            }
        }
    }

    /// Drops filtered lines, keeping the survivors newline-separated.
    pub fn apply(&self, text: &str) -> String {
        text.split('\n')
            .filter(|line| self.keeps(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Convenience wrapper over [`LineFilter::apply`].
pub fn filter_lines(text: &str, mode: LineFilterMode) -> String {
    LineFilter::new(mode).apply(text)
}

fn keeps_content_line(line: &str) -> bool {
    if line.chars().count() < 3 {
        return false;
    }

    if BIBLIOGRAPHIC_METADATA.is_match(line) {
        return false;
    }

    if AUTHOR_LINE.is_match(line) {
        return false;
    }

    let lower = line.to_lowercase();
    if lower.starts_with("resolução nº") {
        return false;
    }

    !is_english_dominated(&lower)
}

/// English stop words outnumber Portuguese ones (and there are at least two).
fn is_english_dominated(lower: &str) -> bool {
    let words: Vec<&str> = ASCII_WORD.find_iter(lower).map(|m| m.as_str()).collect();
    if words.len() < 3 {
        return false;
    }
    let english = words.iter().filter(|w| ENGLISH_STOPS.contains(*w)).count();
    let portuguese = words.iter().filter(|w| PORTUGUESE_STOPS.contains(*w)).count();
    english > portuguese && english >= 2
}
