//! Accepted sentences of one source document.

use serde::Serialize;

/// Ordered accepted sentences of one document plus its source name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentenceFile {
    /// Name derived from the document URL or filename
    pub source_name: String,
    /// Accepted sentences, in document order
    pub sentences: Vec<String>,
}

impl SentenceFile {
    /// Creates a sentence file.
    pub fn new(source_name: impl Into<String>, sentences: Vec<String>) -> Self {
        Self {
            source_name: source_name.into(),
            sentences,
        }
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Returns true if every candidate was rejected.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Total whitespace-delimited words.
    pub fn word_count(&self) -> usize {
        self.sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum()
    }

    /// On-disk form: one sentence per line, newline-terminated, no header.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.sentences.iter().map(|s| s.len() + 1).sum());
        for sentence in &self.sentences {
            out.push_str(sentence);
            out.push('\n');
        }
        out
    }
}
