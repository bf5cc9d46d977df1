//! Corpus statistics.
//!
//! Token counts, lexical richness, most frequent content words and filtered
//! n-grams over a compiled corpus or a single sentence file.

use crate::segment::Segmenter;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Word tokens or single punctuation marks.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+(?:[-']\w+)*|[^\w\s]").unwrap());

static HAS_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}").unwrap());

/// Portuguese function words plus layout vocabulary common in slide decks.
pub static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às",
        "até", "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois",
        "do", "dos", "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram",
        "essa", "essas", "esse", "esses", "esta", "está", "estão", "estas", "estava", "este",
        "estes", "eu", "foi", "foram", "há", "isso", "isto", "já", "lhe", "lhes", "mais", "mas",
        "me", "mesmo", "meu", "minha", "muito", "na", "não", "nas", "nem", "no", "nos", "nós",
        "nossa", "nosso", "num", "numa", "o", "os", "ou", "para", "pela", "pelas", "pelo",
        "pelos", "por", "qual", "quando", "que", "quem", "são", "se", "seja", "sem", "ser",
        "será", "seu", "seus", "só", "sua", "suas", "também", "te", "tem", "têm", "ter",
        "teve", "tinha", "um", "uma", "umas", "uns", "você", "vocês", "vos", "sobre", "segundo",
        "figura", "tabela", "imagem", "exemplo", "page", "ocr",
    ]
    .into_iter()
    .collect()
});

/// A counted term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Statistics for one text.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusStats {
    pub total_sentences: usize,
    pub total_tokens_raw: usize,
    pub total_tokens_clean: usize,
    pub unique_words: usize,
    /// Clean tokens over raw tokens
    pub lexical_richness: f64,
    pub top_terms: Vec<TermCount>,
    pub sentences_sample: Vec<String>,
}

/// Lowercased word and punctuation tokens in text order.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Content words: not a stopword, at least two characters, contains a letter.
pub fn is_content_token(token: &str) -> bool {
    !STOPWORDS.contains(token) && token.chars().count() >= 2 && HAS_LETTER.is_match(token)
}

/// Computes corpus statistics.
pub fn analyze(text: &str, segmenter: &dyn Segmenter, top: usize) -> CorpusStats {
    let sentences = if text.trim().is_empty() {
        Vec::new()
    } else {
        segmenter.segment(text)
    };
    let raw = tokenize(text);
    let clean: Vec<&str> = raw
        .iter()
        .map(String::as_str)
        .filter(|t| is_content_token(t))
        .collect();

    let unique_words = clean.iter().collect::<HashSet<_>>().len();
    let lexical_richness = if raw.is_empty() {
        0.0
    } else {
        clean.len() as f64 / raw.len() as f64
    };

    CorpusStats {
        total_sentences: sentences.len(),
        total_tokens_raw: raw.len(),
        total_tokens_clean: clean.len(),
        unique_words,
        lexical_richness,
        top_terms: most_common(clean.iter().map(|t| t.to_string()), top),
        sentences_sample: sentences.into_iter().take(3).collect(),
    }
}

/// An n-gram is useful when both edges are content words.
pub fn is_valid_ngram<S: AsRef<str>>(gram: &[S]) -> bool {
    match (gram.first(), gram.last()) {
        (Some(first), Some(last)) => {
            is_content_token(first.as_ref()) && is_content_token(last.as_ref())
        }
        _ => false,
    }
}

/// Most frequent valid n-grams over raw tokens.
///
/// # Example
///
/// ```
/// use descreve::analysis::{ngrams, tokenize};
///
/// let tokens = tokenize("Focos de calor. Focos de calor no Cerrado. Focos ativos.");
/// let top = ngrams(&tokens, 3, 1);
/// assert_eq!(top[0].term, "focos de calor");
/// assert_eq!(top[0].count, 2);
/// ```
pub fn ngrams<S: AsRef<str>>(tokens: &[S], n: usize, top_k: usize) -> Vec<TermCount> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    let grams = tokens
        .windows(n)
        .filter(|w| is_valid_ngram(w))
        .map(|w| {
            w.iter()
                .map(|t| t.as_ref())
                .collect::<Vec<_>>()
                .join(" ")
        });
    most_common(grams, top_k)
}

/// Counts items, ordering by count then first appearance.
fn most_common(items: impl Iterator<Item = String>, k: usize) -> Vec<TermCount> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (index, item) in items.enumerate() {
        counts.entry(item).or_insert((0, index)).0 += 1;
    }
    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(k)
        .map(|(term, count, _)| TermCount { term, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::RuleSegmenter;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("O fogo, no Mato-Grosso!"),
            vec!["o", "fogo", ",", "no", "mato-grosso", "!"]
        );
    }

    #[test]
    fn test_content_tokens() {
        assert!(is_content_token("queimada"));
        assert!(!is_content_token("de"));
        assert!(!is_content_token("2020"));
        assert!(!is_content_token("x"));
        assert!(!is_content_token("figura"));
        assert!(is_content_token("r2"));
    }

    #[test]
    fn test_analyze() {
        let text = "O fogo avançou no Cerrado. O fogo voltou ao Cerrado em 2020.";
        let stats = analyze(text, &RuleSegmenter::new(), 2);
        assert_eq!(stats.total_sentences, 2);
        assert_eq!(stats.total_tokens_raw, 14);
        assert_eq!(stats.total_tokens_clean, 6);
        assert_eq!(stats.unique_words, 4);
        assert!((stats.lexical_richness - 6.0 / 14.0).abs() < 1e-9);
        assert_eq!(
            stats.top_terms,
            vec![
                TermCount { term: "fogo".into(), count: 2 },
                TermCount { term: "cerrado".into(), count: 2 },
            ]
        );
        assert_eq!(stats.sentences_sample.len(), 2);
    }

    #[test]
    fn test_analyze_empty() {
        let stats = analyze("", &RuleSegmenter::new(), 5);
        assert_eq!(stats.total_tokens_raw, 0);
        assert_eq!(stats.lexical_richness, 0.0);
        assert!(stats.top_terms.is_empty());
    }

    #[test]
    fn test_ngram_edges() {
        assert!(is_valid_ngram(&["banco", "de", "dados"]));
        assert!(!is_valid_ngram(&["de", "dados"]));
        assert!(!is_valid_ngram(&["banco", "de"]));
        assert!(!is_valid_ngram(&["fogo", "."]));
        assert!(!is_valid_ngram::<&str>(&[]));
    }

    #[test]
    fn test_bigrams() {
        let tokens = tokenize("focos de calor no cerrado. focos ativos no cerrado.");
        let top = ngrams(&tokens, 2, 5);
        assert_eq!(top, vec![TermCount { term: "focos ativos".into(), count: 1 }]);
    }

    #[test]
    fn test_ngrams_too_short() {
        assert!(ngrams(&["fogo"], 2, 5).is_empty());
        assert!(ngrams(&["fogo", "ativo"], 0, 5).is_empty());
    }
}
