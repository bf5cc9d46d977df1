//! Encoding and control-character repair.
//!
//! First pass of every cleanup profile. Text scraped from PDFs and CMS exports
//! frequently carries UTF-8 bytes that were decoded as MacRoman somewhere
//! upstream (`√°` instead of `á`), plus invisible format characters that break
//! regex anchors later on.

use unicode_normalization::UnicodeNormalization;

/// UTF-8 sequences misread as MacRoman, mapped back to the intended character.
///
/// Keys are disjoint literals, so replacement order does not matter.
const MOJIBAKE_TABLE: &[(&str, &str)] = &[
    // Lowercase accented letters
    ("√°", "á"),
    ("√†", "à"),
    ("√¢", "â"),
    ("√£", "ã"),
    ("√§", "ä"),
    ("√©", "é"),
    ("√®", "è"),
    ("√™", "ê"),
    ("√´", "ë"),
    ("√≠", "í"),
    ("√¨", "ì"),
    ("√Æ", "î"),
    ("√Ø", "ï"),
    ("√≥", "ó"),
    ("√≤", "ò"),
    ("√¥", "ô"),
    ("√µ", "õ"),
    ("√∂", "ö"),
    ("√∫", "ú"),
    ("√π", "ù"),
    ("√ª", "û"),
    ("√º", "ü"),
    ("√ß", "ç"),
    ("√±", "ñ"),
    // Uppercase accented letters
    ("√Å", "Á"),
    ("√Ä", "À"),
    ("√Ç", "Â"),
    ("√É", "Ã"),
    ("√â", "É"),
    ("√à", "È"),
    ("√ä", "Ê"),
    ("√ç", "Í"),
    ("√é", "Î"),
    ("√ì", "Ó"),
    ("√í", "Ò"),
    ("√î", "Ô"),
    ("√ï", "Õ"),
    ("√ö", "Ú"),
    ("√ô", "Ù"),
    ("√õ", "Û"),
    ("√á", "Ç"),
    // Smart punctuation
    ("‚Äì", "\u{2013}"),
    ("‚Äî", "\u{2014}"),
    ("‚Äò", "\u{2018}"),
    ("‚Äô", "\u{2019}"),
    ("‚Äú", "\u{201C}"),
    ("‚Äù", "\u{201D}"),
    ("‚Ä¶", "\u{2026}"),
];

/// Marker character left behind by MacRoman mojibake.
pub const MOJIBAKE_MARKER: char = '√';

/// Replaces known MacRoman mojibake sequences with the correct characters.
///
/// # Example
///
/// ```
/// use descreve::repair::fix_mojibake;
///
/// assert_eq!(fix_mojibake("A √°rea atingida"), "A área atingida");
/// ```
pub fn fix_mojibake(text: &str) -> String {
    if !text.contains(MOJIBAKE_MARKER) && !text.contains('‚') {
        return text.to_string();
    }

    let mut result = text.to_string();
    for (bad, good) in MOJIBAKE_TABLE {
        if result.contains(bad) {
            result = result.replace(bad, good);
        }
    }
    result
}

/// Removes characters of the Unicode "Other" class (control, format, private use).
///
/// Newlines and tabs survive so that per-line rules keep working; carriage
/// returns are folded into `\n`.
pub fn strip_control_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push('\n');
            }
            '\n' | '\t' => result.push(c),
            c if c.is_control() || is_format_char(c) || is_pua_char(c) => {}
            c => result.push(c),
        }
    }

    result
}

/// Full repair pass: mojibake table, control stripping, NFC composition.
pub fn repair(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let fixed = fix_mojibake(text);
    strip_control_chars(&fixed).nfc().collect()
}

/// Counts mojibake markers in a line.
pub fn mojibake_marker_count(line: &str) -> usize {
    line.chars().filter(|&c| c == MOJIBAKE_MARKER).count()
}

/// Check if character belongs to the Unicode format category (Cf)
fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'                       // Soft hyphen
        | '\u{0600}'..='\u{0605}'
        | '\u{061C}'
        | '\u{06DD}'
        | '\u{070F}'
        | '\u{180E}'
        | '\u{200B}'..='\u{200F}'        // Zero-width chars, LRM/RLM
        | '\u{202A}'..='\u{202E}'        // Bidi embedding
        | '\u{2060}'..='\u{2064}'
        | '\u{2066}'..='\u{206F}'
        | '\u{FEFF}'                     // BOM
        | '\u{FFF9}'..='\u{FFFB}'
        | '\u{110BD}'
        | '\u{1BCA0}'..='\u{1BCA3}'
        | '\u{1D173}'..='\u{1D17A}'
        | '\u{E0001}'
        | '\u{E0020}'..='\u{E007F}'
    )
}

/// Check if character is in Private Use Area
fn is_pua_char(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}
