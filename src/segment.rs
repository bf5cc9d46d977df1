//! Sentence segmentation.
//!
//! The pipeline only depends on the [`Segmenter`] trait. [`RuleSegmenter`] is
//! the default: a rule-based splitter tuned for Portuguese prose.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Splits normalized text into candidate sentences.
pub trait Segmenter: Send + Sync {
    /// Returns the candidate sentences in text order.
    fn segment(&self, text: &str) -> Vec<String>;
}

impl<F> Segmenter for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn segment(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

static ABBREVIATIONS: &[&str] = &[
    "sr.", "sra.", "srs.", "dr.", "dra.", "drs.", "prof.", "profa.", "profs.", "eng.", "arq.",
    "art.", "arts.", "inc.", "cap.", "caps.", "fig.", "figs.", "tab.", "vol.", "ed.",
    "org.", "orgs.", "coord.", "p.", "pp.", "v.", "n.", "nº.", "núm.", "al.", "etc.",
    "ex.", "obs.", "op.", "cit.", "aprox.", "av.", "km.", "ha.", "min.", "máx.", "mín.", "séc.",
    "jan.", "fev.", "abr.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "ltda.", "cia.",
    "s.a.", "dep.", "gov.", "sen.", "pres.", "i.e.", "e.g.", "a.c.", "d.c.",
];

static ABBREVIATIONS_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ABBREVIATIONS.iter().copied().collect());

/// Characters that end a sentence.
const TERMINATORS: &[char] = &['.', '!', '?'];

/// Closing characters that stay attached to the sentence they close.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}', '\u{BB}'];

/// Opening characters that may start the next sentence.
const OPENERS: &[char] = &['"', '\'', '(', '\u{201C}', '\u{2018}', '\u{AB}', '-', '\u{2014}'];

/// Rule-based Portuguese sentence splitter.
///
/// Breaks after `.`, `!` or `?` (plus any closing quotes or parentheses) when
/// whitespace follows and the next token starts with an uppercase letter, a
/// digit or an opening quote. Abbreviations, single-letter initials and
/// outline numbers never end a sentence.
///
/// # Example
///
/// ```
/// use descreve::segment::{RuleSegmenter, Segmenter};
///
/// let text = "O Sr. Silva visitou o Pantanal. Os focos caíram 2.5%. Foi bom?";
/// assert_eq!(
///     RuleSegmenter::new().segment(text),
///     vec!["O Sr. Silva visitou o Pantanal.", "Os focos caíram 2.5%.", "Foi bom?"]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSegmenter {
    extra_abbreviations: HashSet<String>,
}

impl RuleSegmenter {
    /// Creates a segmenter with the built-in abbreviation list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds abbreviations (with trailing dot, case-insensitive).
    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_abbreviations
            .extend(abbreviations.into_iter().map(|a| a.as_ref().to_lowercase()));
        self
    }

    fn is_abbreviation(&self, word: &str) -> bool {
        let trimmed = word.trim_start_matches(|c: char| OPENERS.contains(&c) || c == '[');
        if trimmed.is_empty() {
            return false;
        }
        let lower = trimmed.to_lowercase();
        ABBREVIATIONS_SET.contains(lower.as_str()) || self.extra_abbreviations.contains(&lower)
    }

    /// True if the text ending at a period must not be split there.
    fn tail_blocks_break(&self, sentence: &str) -> bool {
        let Some(last) = sentence.split_whitespace().next_back() else {
            return false;
        };
        is_initial(last) || self.is_abbreviation(last) || sentence_is_ordinal_marker(sentence)
    }
}

impl Segmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (pos, c) = chars[i];
            if !TERMINATORS.contains(&c) {
                i += 1;
                continue;
            }

            // Absorb runs like "?!", "..." and closing quotes.
            let mut j = i + 1;
            while j < chars.len()
                && (TERMINATORS.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1))
            {
                j += 1;
            }
            let end = chars.get(j).map_or(text.len(), |&(p, _)| p);

            let followed_by_space = chars.get(j).map_or(true, |&(_, n)| n.is_whitespace());
            if !followed_by_space {
                i = j;
                continue;
            }

            let next = chars[j..]
                .iter()
                .map(|&(_, n)| n)
                .find(|n| !n.is_whitespace());
            let starts_new = match next {
                None => true,
                Some(n) => n.is_uppercase() || n.is_ascii_digit() || OPENERS.contains(&n),
            };

            let blocked = c == '.' && self.tail_blocks_break(&text[start..pos + c.len_utf8()]);
            if starts_new && !blocked {
                push_trimmed(&mut sentences, &text[start..end]);
                start = end;
            }
            i = j;
        }

        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }
}

fn push_trimmed(sentences: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// "J." style initials.
fn is_initial(fragment: &str) -> bool {
    let mut chars = fragment.trim().chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.'), None) if c.is_uppercase()
    )
}

/// Sentence so far is only an outline number such as "2." or "3.1.".
fn sentence_is_ordinal_marker(sentence: &str) -> bool {
    let trimmed = sentence.trim();
    !trimmed.is_empty()
        && !trimmed.contains(char::is_whitespace)
        && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Splits with the default [`RuleSegmenter`].
pub fn split_sentences(text: &str) -> Vec<String> {
    RuleSegmenter::new().segment(text)
}
