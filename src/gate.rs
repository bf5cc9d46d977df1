//! Sentence acceptance gate.
//!
//! Converts a segmented candidate into a persisted training example, or
//! rejects it.

use crate::narrative::is_narrative;
use regex::Regex;
use std::sync::LazyLock;

/// Characters an accepted sentence may end with.
pub const TERMINAL_CHARS: &[char] = &['.', '!', '?', '"', '\'', ')', ':'];

static OUTLINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*\.?\s+").unwrap());

/// Validates a candidate sentence.
///
/// Returns the canonical form (single line, no leading outline number) or
/// `None` when the candidate lacks terminal punctuation or is not narrative,
/// before or after the outline number is removed.
///
/// # Example
///
/// ```
/// use descreve::gate::accept;
///
/// assert_eq!(
///     accept("2.1 O fogo atingiu a vegetação do Cerrado."),
///     Some("O fogo atingiu a vegetação do Cerrado.".to_string())
/// );
/// assert_eq!(accept("O fogo atingiu a vegetação"), None);
/// ```
pub fn accept(sentence: &str) -> Option<String> {
    let flat = sentence.replace('\n', " ");
    let candidate = flat.trim();

    if !is_narrative(candidate) {
        return None;
    }

    if !candidate.ends_with(TERMINAL_CHARS) {
        return None;
    }

    let stripped = OUTLINE_PREFIX.replace(candidate, "");
    // The outline number counts as a word; recheck what remains.
    if !is_narrative(&stripped) {
        return None;
    }

    Some(stripped.into_owned())
}

/// Runs [`accept`] over a candidate list, keeping order.
pub fn accept_all<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter_map(|c| accept(c.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_plain_sentence() {
        let s = "O INPE detectou focos de calor no Pantanal.";
        assert_eq!(accept(s), Some(s.to_string()));
    }

    #[test]
    fn test_accept_terminal_chars() {
        assert!(accept("O fogo vai voltar ao Cerrado?").is_some());
        assert!(accept("Disse o pesquisador: \"o fogo voltou\"").is_some());
        assert!(accept("Os dados do satélite (NASA)").is_some());
        assert!(accept("Os principais fatores são os seguintes:").is_some());
        assert!(accept("O fogo voltou ao Cerrado em 2020").is_none());
    }

    #[test]
    fn test_accept_flattens_newlines() {
        assert_eq!(
            accept("O fogo atingiu\na vegetação nativa."),
            Some("O fogo atingiu a vegetação nativa.".to_string())
        );
    }

    #[test]
    fn test_accept_strips_outline_numbers() {
        assert_eq!(
            accept("3. Os focos aumentaram em agosto."),
            Some("Os focos aumentaram em agosto.".to_string())
        );
        assert_eq!(
            accept("1.2.3 Os focos aumentaram em agosto."),
            Some("Os focos aumentaram em agosto.".to_string())
        );
    }

    #[test]
    fn test_accept_rejects_non_narrative() {
        assert_eq!(accept("Figura 2 Focos de calor por mês."), None);
        assert_eq!(accept("Focos aumentaram."), None);
        assert_eq!(accept(""), None);
    }

    #[test]
    fn test_accept_all_preserves_order() {
        let candidates = vec![
            "A queimada destruiu a mata ciliar.",
            "lixo",
            "O INPE monitora o fogo por satélite.",
        ];
        assert_eq!(
            accept_all(candidates),
            vec![
                "A queimada destruiu a mata ciliar.".to_string(),
                "O INPE monitora o fogo por satélite.".to_string(),
            ]
        );
    }

    #[test]
    fn test_accepted_sentences_satisfy_invariants() {
        let candidates = [
            "  10. Incêndios florestais atingem o Pantanal!  ",
            "Tabela 1 Focos por estado.",
            "O monitoramento é diário e automático.",
            "1. O fogo voltou.",
            "2.1 Focos em agosto.",
        ];
        for sentence in accept_all(candidates) {
            assert!(is_narrative(&sentence));
            assert!(sentence.ends_with(TERMINAL_CHARS));
            assert!(!sentence.starts_with(|c: char| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_accept_rejects_short_sentence_behind_outline_number() {
        assert_eq!(accept("1. O fogo voltou."), None);
        assert_eq!(accept("2.1 Focos em agosto."), None);
        assert_eq!(
            accept("1. O fogo voltou ao Cerrado."),
            Some("O fogo voltou ao Cerrado.".to_string())
        );
    }
}
