//! Punctuation and spacing normalization.
//!
//! [`normalize`] is the last pass before segmentation: it re-inserts spaces lost
//! during extraction, separates glued state names, folds typographic
//! punctuation to ASCII and collapses all whitespace. It is idempotent.
//!
//! The remaining helpers are web-profile fixups applied before the rule
//! groups ([`fix_broken_words`], [`normalize_numbers`]) or after them
//! ([`repair_malformed_citations`], [`remove_sidebar_intrusions`],
//! [`fix_sticky_suffixes`]).

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Brazilian state names as they appear in uppercase dashboard blocks.
const BRAZILIAN_STATES: &[&str] = &[
    "ACRE",
    "ALAGOAS",
    "AMAPÁ",
    "AMAZONAS",
    "BAHIA",
    "CEARÁ",
    "DISTRITO FEDERAL",
    "ESPÍRITO SANTO",
    "GOIÁS",
    "MARANHÃO",
    "MATO GROSSO DO SUL",
    "MATO GROSSO",
    "MINAS GERAIS",
    "PARÁ",
    "PARAÍBA",
    "PARANÁ",
    "PERNAMBUCO",
    "PIAUÍ",
    "RIO DE JANEIRO",
    "RIO GRANDE DO NORTE",
    "RIO GRANDE DO SUL",
    "RONDÔNIA",
    "RORAIMA",
    "SANTA CATARINA",
    "SÃO PAULO",
    "SERGIPE",
    "TOCANTINS",
];

/// Brand names split apart by the missing-space pass.
const BRAND_FIXUPS: &[(&str, &str)] = &[
    ("Map Biomas", "MapBiomas"),
    ("You Tube", "YouTube"),
    ("Whats App", "WhatsApp"),
    ("Terra Brasilis", "TerraBrasilis"),
    ("BD Queimadas", "BDQueimadas"),
    ("Linked In", "LinkedIn"),
];

const TYPOGRAPHIC_PUNCTUATION: &[(char, char)] = &[
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{2013}', '-'),
    ('\u{2014}', '-'),
];

static STICKY_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([:;)])(\p{Lu})").unwrap());

/// Single leftmost-first alternation, longest names first.
static STATE_NAMES: LazyLock<Regex> = LazyLock::new(|| {
    let mut states = BRAZILIAN_STATES.to_vec();
    states.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
    let alternation = states
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?:{})", alternation)).unwrap()
});

static LOWER_UPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\p{Ll})(\p{Lu})").unwrap());
static UPPER_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{Lu})(\p{Lu}\p{Ll})").unwrap());
static DIGIT_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)([A-Za-z])").unwrap());
static PERIOD_UPPER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(\p{Lu})").unwrap());

static BROKEN_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)-\s+(\w+)").unwrap());
static GLUED_ET_AL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z])et al\.").unwrap());
static SIDEBAR_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])\s*[•●]\s*").unwrap());
static PRINT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\w)print\b").unwrap());
static INFO_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\w)info\b").unwrap());
static GLUED_YEARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})(\d{4})\b").unwrap());

/// Normalizes punctuation and spacing.
///
/// # Example
///
/// ```
/// use descreve::normalize::normalize;
///
/// let text = "Focos no PARÁMATO GROSSO:Queimadas\n  cresceram “muito”";
/// assert_eq!(
///     normalize(text),
///     "Focos no PARÁ MATO GROSSO: Queimadas cresceram \"muito\""
/// );
/// ```
pub fn normalize(text: &str) -> String {
    let text = STICKY_PUNCTUATION.replace_all(text, "$1 $2");
    let text = inject_missing_spaces(&text);
    let text = separate_states(&text);
    let text = fold_typographic_punctuation(&text);
    // Brands are rejoined last so a split spanning a line break is caught.
    fix_brand_names(&collapse_whitespace(&text))
}

/// Inserts spaces at case and digit boundaries lost during extraction.
pub fn inject_missing_spaces(text: &str) -> String {
    let text = LOWER_UPPER.replace_all(text, "$1 $2");
    let text = UPPER_TITLE.replace_all(&text, "$1 $2");
    let text = DIGIT_LETTER.replace_all(&text, "$1 $2");
    PERIOD_UPPER.replace_all(&text, ". $1").into_owned()
}

/// Separates Brazilian state names glued to neighbouring words.
pub fn separate_states(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for m in STATE_NAMES.find_iter(text) {
        result.push_str(&text[last..m.start()]);
        let before = result.chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_some_and(char::is_alphanumeric) {
            result.push(' ');
        }
        result.push_str(m.as_str());
        if after.is_some_and(char::is_alphanumeric) {
            result.push(' ');
        }
        last = m.end();
    }
    result.push_str(&text[last..]);
    result
}

fn fix_brand_names(text: &str) -> String {
    let mut result = text.to_string();
    for (split, brand) in BRAND_FIXUPS {
        if result.contains(split) {
            result = result.replace(split, brand);
        }
    }
    result
}

fn fold_typographic_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| {
            TYPOGRAPHIC_PUNCTUATION
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}

/// Collapses newlines and whitespace runs into single spaces and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Web-profile helpers
// ============================================================================

/// Joins words split by a hyphen and whitespace: "monitora- mento".
pub fn fix_broken_words(text: &str) -> String {
    BROKEN_WORD.replace_all(text, "${1}${2}").into_owned()
}

/// Drops thousands dots between digits: "1.234.567" becomes "1234567".
pub fn normalize_numbers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let between_digits = c == '.'
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if !between_digits {
            result.push(c);
        }
    }
    result
}

/// Restores the space before an "et al." glued to the previous word.
pub fn repair_malformed_citations(text: &str) -> String {
    GLUED_ET_AL.replace_all(text, "$1 et al.").into_owned()
}

/// Replaces bullet glyphs glued into prose by a sentence break.
pub fn remove_sidebar_intrusions(text: &str) -> String {
    let text = SIDEBAR_BULLET.replace_all(text, "$1. ");
    text.replace(['•', '●'], "")
}

/// Removes share-button residue ("...queimadasprint") and splits glued year pairs.
pub fn fix_sticky_suffixes(text: &str) -> String {
    let text = PRINT_SUFFIX.replace_all(text, "$1");
    let text = INFO_SUFFIX.replace_all(&text, "$1");
    GLUED_YEARS
        .replace_all(&text, |caps: &Captures| format!("{} {}", &caps[1], &caps[2]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_punctuation() {
        assert_eq!(normalize("Resultado:Queimadas"), "Resultado: Queimadas");
        assert_eq!(normalize("fim;Início"), "fim; Início");
        assert_eq!(normalize("(INPE)Focos"), "(INPE) Focos");
    }

    #[test]
    fn test_missing_spaces() {
        assert_eq!(normalize("queimadasAumentaram"), "queimadas Aumentaram");
        assert_eq!(normalize("INPEQueimadas"), "INPE Queimadas");
        assert_eq!(normalize("2020focos"), "2020 focos");
        assert_eq!(normalize("fim.Começo"), "fim. Começo");
    }

    #[test]
    fn test_decimal_numbers_untouched() {
        assert_eq!(normalize("cresceu 2.5 vezes"), "cresceu 2.5 vezes");
    }

    #[test]
    fn test_states_longest_first() {
        assert_eq!(
            separate_states("CERRADOMATO GROSSO DO SULPANTANAL"),
            "CERRADO MATO GROSSO DO SUL PANTANAL"
        );
        assert_eq!(separate_states("MATO GROSSOPARÁ"), "MATO GROSSO PARÁ");
        assert_eq!(separate_states("PARANÁ"), "PARANÁ");
    }

    #[test]
    fn test_states_already_spaced() {
        let text = "focos em MATO GROSSO e PARÁ";
        assert_eq!(separate_states(text), text);
    }

    #[test]
    fn test_brand_fixups() {
        assert_eq!(normalize("dados do MapBiomas"), "dados do MapBiomas");
        assert_eq!(normalize("vídeo no YouTube"), "vídeo no YouTube");
        assert_eq!(normalize("plataforma TerraBrasilis"), "plataforma TerraBrasilis");
    }

    #[test]
    fn test_typographic_punctuation() {
        assert_eq!(
            normalize("\u{201C}fogo\u{201D} \u{2013} \u{2018}chama\u{2019}"),
            "\"fogo\" - 'chama'"
        );
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize("  linha um\n\n linha\tdois  "), "linha um linha dois");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let inputs = [
            "Focos no PARÁMATO GROSSO:Queimadas\n cresceram",
            "dados do MapBiomas e do BDQueimadas.O INPE",
            "2020queimadas (INPE)Focos “aspas” — travessão",
            "AMAZONASRONDÔNIA e LinkedIn WhatsApp",
            "dados do Map\nBiomas mostram focos",
            "Map  Biomas e Linked\tIn",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_brand_split_across_line_break() {
        assert_eq!(
            normalize("dados do Map\nBiomas mostram focos"),
            "dados do MapBiomas mostram focos"
        );
    }

    #[test]
    fn test_fix_broken_words() {
        assert_eq!(fix_broken_words("monitora- mento"), "monitoramento");
        assert_eq!(fix_broken_words("monitora-\nmento"), "monitoramento");
        assert_eq!(fix_broken_words("meio-ambiente"), "meio-ambiente");
    }

    #[test]
    fn test_normalize_numbers() {
        assert_eq!(normalize_numbers("1.234.567 focos"), "1234567 focos");
        assert_eq!(normalize_numbers("fim. 2020"), "fim. 2020");
        assert_eq!(normalize_numbers("v.2"), "v.2");
    }

    #[test]
    fn test_repair_malformed_citations() {
        assert_eq!(repair_malformed_citations("Silvaet al. (2019)"), "Silva et al. (2019)");
        assert_eq!(repair_malformed_citations("Silva et al."), "Silva et al.");
    }

    #[test]
    fn test_remove_sidebar_intrusions() {
        assert_eq!(
            remove_sidebar_intrusions("o fogo avançou • Leia mais"),
            "o fogo avançou. Leia mais"
        );
        assert_eq!(remove_sidebar_intrusions("• item"), " item");
        assert_eq!(remove_sidebar_intrusions("meio-ambiente"), "meio-ambiente");
    }

    #[test]
    fn test_fix_sticky_suffixes() {
        assert_eq!(fix_sticky_suffixes("queimadasprint"), "queimadas");
        assert_eq!(fix_sticky_suffixes("Amazôniainfo"), "Amazônia");
        assert_eq!(fix_sticky_suffixes("entre 20192020"), "entre 2019 2020");
        assert_eq!(fix_sticky_suffixes("print info"), "print info");
    }
}
