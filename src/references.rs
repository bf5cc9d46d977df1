//! Reference-section truncation.
//!
//! Academic PDFs end with bibliographies that are pure noise for a prose
//! corpus. The truncator cuts the text at the start of the last reference
//! header, but only when that header sits in the second half of the document,
//! so a table of contents mentioning "REFERÊNCIAS" does not wipe the body.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Texts shorter than this (in characters) are never truncated.
pub const MIN_TRUNCATION_CHARS: usize = 1000;

struct Marker {
    pattern: Regex,
    /// Cut regardless of position.
    unconditional: bool,
}

/// Reference markers in priority order.
static MARKERS: LazyLock<Vec<Marker>> = LazyLock::new(|| {
    let marker = |pattern: &str, unconditional: bool| Marker {
        pattern: Regex::new(&format!("(?im){}", pattern)).unwrap(),
        unconditional,
    };
    vec![
        marker(r"REFERÊNCIAS BIBLIOGRÁFICAS", false),
        marker(r"REFERÊNCIAS BIBLIOGRAFIAS", false),
        marker(r"LITERATURA CITADA", false),
        marker(r"BIBLIOGRAFIA CONSULTADA", false),
        marker(r"Sugestão de (?:citação|referência):", true),
        marker(r"^[ \t]*REFERÊNCIAS[ \t]*$", false),
    ]
});

/// Cuts the text at the reference section, if one is found.
///
/// Markers are tried in priority order; for each, only its last occurrence is
/// considered. The first marker whose last occurrence lies past the character
/// midpoint (or that is unconditional) decides the cut.
pub fn truncate(text: &str) -> String {
    let total_chars = text.chars().count();
    if total_chars < MIN_TRUNCATION_CHARS {
        return text.to_string();
    }
    let midpoint = total_chars / 2;

    for marker in MARKERS.iter() {
        let Some(last) = marker.pattern.find_iter(text).last() else {
            continue;
        };
        let offset = text[..last.start()].chars().count();
        if marker.unconditional || offset > midpoint {
            debug!(
                marker = marker.pattern.as_str(),
                offset, total_chars, "truncating reference section"
            );
            return text[..last.start()].to_string();
        }
    }

    text.to_string()
}
