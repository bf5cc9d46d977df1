//! # descreve
//!
//! Normalization and compilation engine for wildfire-domain Portuguese
//! training corpora.
//!
//! Raw documents (news pages, PDF extractions, dashboard snapshots) go
//! through a staged cleanup, are split into candidate sentences, filtered by
//! an acceptance gate and written as one sentence file per document. The
//! compiler then merges sentence files into a deduplicated, keyword-filtered
//! corpus.
//!
//! ## Quick Start
//!
//! ```
//! use descreve::{clean_text, SourceType};
//!
//! let clean = clean_text("Os focos aumentaram no Pará.O fogo voltou.", SourceType::WebNews);
//! assert_eq!(clean, "Os focos aumentaram no Pará. O fogo voltou.");
//! ```
//!
//! ## Processing documents
//!
//! ```no_run
//! use descreve::{Pipeline, RawDocument, SourceType};
//!
//! let doc = RawDocument::new(
//!     "O INPE detectou focos de calor no Pantanal.",
//!     SourceType::WebNews,
//!     "https://g1.globo.com/meio-ambiente/fogo.ghtml",
//! );
//! let report = Pipeline::new().save_all(&[doc], "data/04_training_corpus")?;
//! println!("{} sentences", report.sentences);
//! # Ok::<(), descreve::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: Tokio facade over the blocking pipeline
//! - `python`: Python bindings via pyo3

pub mod analysis;
pub mod batch;
pub mod cleanup;
pub mod compiler;
pub mod error;
pub mod gate;
pub mod model;
pub mod narrative;
pub mod normalize;
pub mod references;
pub mod repair;
pub mod rules;
pub mod segment;
pub mod storage;

#[cfg(feature = "async")]
pub mod async_api;

#[cfg(feature = "python")]
mod python;

// Re-exports
pub use analysis::{analyze, ngrams, CorpusStats, TermCount};
pub use batch::{BatchOptions, BatchReport, ProcessedDocument};
pub use cleanup::{cleanup, CleanupOptions, CleanupProfile};
pub use compiler::{compile, CompileOptions, CompileReport, DomainKeywords};
pub use error::{Error, Result};
pub use gate::accept;
pub use model::{RawDocument, SentenceFile, SourceType};
pub use narrative::{is_narrative, LineFilter, LineFilterMode};
pub use normalize::normalize;
pub use segment::{RuleSegmenter, Segmenter};

use std::path::Path;

/// Cleans text with the profile matching its source type.
///
/// # Example
///
/// ```
/// use descreve::{clean_text, SourceType};
///
/// let clean = clean_text("<p>O fogo   avançou.</p>", SourceType::WebNews);
/// assert_eq!(clean, "O fogo avançou.");
/// ```
pub fn clean_text(text: &str, source_type: SourceType) -> String {
    cleanup(text, &CleanupOptions::for_source(source_type))
}

/// Cleans, segments and gates text, returning the accepted sentences.
///
/// # Example
///
/// ```
/// use descreve::{extract_sentences, SourceType};
///
/// let sentences = extract_sentences("O fogo avançou no Cerrado. Fim", SourceType::WebNews);
/// assert_eq!(sentences, vec!["O fogo avançou no Cerrado."]);
/// ```
pub fn extract_sentences(text: &str, source_type: SourceType) -> Vec<String> {
    let clean = clean_text(text, source_type);
    gate::accept_all(segment::split_sentences(&clean))
}

/// Loads a raw document from disk and processes it with default settings.
///
/// # Example
///
/// ```no_run
/// use descreve::{process_file, SourceType};
///
/// let processed = process_file("data/raw/relatorio.txt", SourceType::PdfDocument)?;
/// println!("{}", processed.sentences.to_text());
/// # Ok::<(), descreve::Error>(())
/// ```
pub fn process_file(path: impl AsRef<Path>, source_type: SourceType) -> Result<ProcessedDocument> {
    let doc = storage::load_document(path, source_type)?;
    Pipeline::new().process(&doc)
}

/// Builder for document processing.
///
/// Provides a fluent API for configuring cleanup, segmentation and
/// parallelism.
///
/// # Example
///
/// ```no_run
/// use descreve::{CleanupOptions, Pipeline, RawDocument, RuleSegmenter, SourceType};
///
/// let docs = vec![RawDocument::new("texto extraído", SourceType::PdfDocument, "relatorio.pdf")];
/// let report = Pipeline::new()
///     .with_cleanup(CleanupOptions::default().without_truncation())
///     .with_segmenter(RuleSegmenter::new().with_abbreviations(["Ibama."]))
///     .sequential()
///     .save_all(&docs, "out")?;
/// # Ok::<(), descreve::Error>(())
/// ```
pub struct Pipeline {
    segmenter: Box<dyn Segmenter>,
    options: BatchOptions,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates a pipeline with the rule segmenter and per-source cleanup.
    pub fn new() -> Self {
        Self {
            segmenter: Box::new(RuleSegmenter::new()),
            options: BatchOptions::default(),
        }
    }

    /// Uses the same cleanup options for every document.
    pub fn with_cleanup(mut self, options: CleanupOptions) -> Self {
        self.options = self.options.with_cleanup(options);
        self
    }

    /// Replaces the sentence segmenter.
    pub fn with_segmenter(mut self, segmenter: impl Segmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Disables parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    /// Processes a single document.
    pub fn process(&self, doc: &RawDocument) -> Result<ProcessedDocument> {
        batch::process_document(doc, self.segmenter.as_ref(), &self.options)
    }

    /// Processes documents, returning one result per input in input order.
    pub fn process_all(&self, docs: &[RawDocument]) -> Vec<Result<ProcessedDocument>> {
        batch::process_documents(docs, self.segmenter.as_ref(), &self.options)
    }

    /// Processes documents and writes their sentence files to `out_dir`.
    pub fn save_all(&self, docs: &[RawDocument], out_dir: impl AsRef<Path>) -> Result<BatchReport> {
        batch::process_and_save(docs, self.segmenter.as_ref(), &self.options, out_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_by_source() {
        let text = "<b>O fogo</b> avançou no Cerrado.";
        assert_eq!(clean_text(text, SourceType::WebNews), "O fogo avançou no Cerrado.");
    }

    #[test]
    fn test_extract_sentences_gate() {
        let sentences = extract_sentences(
            "O fogo avançou no Cerrado. 1. Introdução A brigada chegou cedo.",
            SourceType::WebNews,
        );
        assert_eq!(sentences[0], "O fogo avançou no Cerrado.");
        assert!(sentences.iter().all(|s| !s.starts_with("1.")));
    }

    #[test]
    fn test_pipeline_custom_segmenter() {
        let by_line = |text: &str| {
            text.split(". ")
                .map(|s| s.trim_end_matches('.').to_string() + ".")
                .collect::<Vec<_>>()
        };
        let pipeline = Pipeline::new().with_segmenter(by_line).sequential();
        let doc = RawDocument::new(
            "O fogo avançou no Cerrado. A brigada chegou cedo ao local.",
            SourceType::WebNews,
            "https://site.org/fogo",
        );
        let out = pipeline.process(&doc).unwrap();
        assert_eq!(
            out.sentences.sentences,
            vec!["O fogo avançou no Cerrado.", "A brigada chegou cedo ao local."]
        );
    }

    #[test]
    fn test_pipeline_process_all_isolates_failures() {
        let docs = vec![
            RawDocument::new("", SourceType::WebNews, "https://a.org/x"),
            RawDocument::new("A queimada cresceu.", SourceType::WebNews, "https://a.org/y"),
        ];
        let results = Pipeline::new().process_all(&docs);
        assert!(matches!(results[0], Err(Error::MalformedDocument { .. })));
        assert!(results[1].is_ok());
    }
}
