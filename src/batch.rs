//! Document to sentence-file processing.
//!
//! Each document runs cleanup, segmentation and the acceptance gate
//! independently. A failing document never aborts the batch: results carry one
//! [`Result`] per input, in input order.

use crate::cleanup::{cleanup, CleanupOptions};
use crate::error::{Error, Result};
use crate::gate::accept_all;
use crate::model::{RawDocument, SentenceFile};
use crate::segment::Segmenter;
use crate::storage;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Batch configuration.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Cleanup override; `None` picks the profile from each document's source type
    pub cleanup: Option<CleanupOptions>,
    /// Process documents on the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            cleanup: None,
            parallel: true,
        }
    }
}

impl BatchOptions {
    /// Processes documents one after another.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Uses the same cleanup options for every document.
    pub fn with_cleanup(mut self, options: CleanupOptions) -> Self {
        self.cleanup = Some(options);
        self
    }

    fn cleanup_for(&self, doc: &RawDocument) -> CleanupOptions {
        self.cleanup
            .clone()
            .unwrap_or_else(|| CleanupOptions::for_source(doc.source_type))
    }
}

/// Outcome for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    /// Candidates produced by the segmenter
    pub candidates: usize,
    /// Accepted sentences
    pub sentences: SentenceFile,
}

impl ProcessedDocument {
    /// Candidates rejected by the gate.
    pub fn rejected(&self) -> usize {
        self.candidates - self.sentences.len()
    }
}

/// Cleans, segments and gates a single document.
pub fn process_document(
    doc: &RawDocument,
    segmenter: &dyn Segmenter,
    options: &BatchOptions,
) -> Result<ProcessedDocument> {
    doc.ensure_content()?;
    let source_name = doc.source_name();

    let clean = cleanup(&doc.content, &options.cleanup_for(doc));
    if clean.is_empty() {
        return Err(Error::malformed(source_name, "no text left after cleanup"));
    }

    let candidates = segmenter.segment(&clean);
    let accepted = accept_all(&candidates);

    Ok(ProcessedDocument {
        candidates: candidates.len(),
        sentences: SentenceFile::new(source_name, accepted),
    })
}

/// Processes many documents, returning one result per input in input order.
pub fn process_documents(
    docs: &[RawDocument],
    segmenter: &dyn Segmenter,
    options: &BatchOptions,
) -> Vec<Result<ProcessedDocument>> {
    if options.parallel {
        docs.par_iter()
            .map(|doc| process_document(doc, segmenter, options))
            .collect()
    } else {
        docs.iter()
            .map(|doc| process_document(doc, segmenter, options))
            .collect()
    }
}

/// Summary of a processing run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Documents seen
    pub documents: usize,
    /// Sentence files written
    pub files: Vec<PathBuf>,
    /// Documents that yielded no accepted sentence
    pub empty: usize,
    /// Accepted sentences written across all files
    pub sentences: usize,
    /// `(source name, reason)` for each failed document
    pub failures: Vec<(String, String)>,
}

impl BatchReport {
    /// Documents processed without error.
    pub fn succeeded(&self) -> usize {
        self.files.len()
    }
}

/// Processes documents and writes one sentence file per successful document.
///
/// Document-scoped failures are logged and recorded in the report; anything
/// else (such as an unusable output directory) aborts with an error.
pub fn process_and_save(
    docs: &[RawDocument],
    segmenter: &dyn Segmenter,
    options: &BatchOptions,
    out_dir: impl AsRef<Path>,
) -> Result<BatchReport> {
    let out_dir = out_dir.as_ref();
    let mut report = BatchReport {
        documents: docs.len(),
        ..BatchReport::default()
    };

    for (doc, outcome) in docs.iter().zip(process_documents(docs, segmenter, options)) {
        let written = outcome.and_then(|processed| {
            let path = storage::write_sentence_file(out_dir, &processed.sentences)?;
            Ok((processed, path))
        });

        match written {
            Ok((processed, path)) => {
                info!(
                    source = %processed.sentences.source_name,
                    candidates = processed.candidates,
                    accepted = processed.sentences.len(),
                    "document processed"
                );
                if processed.sentences.is_empty() {
                    report.empty += 1;
                }
                report.sentences += processed.sentences.len();
                report.files.push(path);
            }
            Err(err) if err.is_document_scoped() => {
                warn!(source = %doc.source_name(), error = %err, "document skipped");
                report.failures.push((doc.source_name(), err.to_string()));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;
    use crate::segment::RuleSegmenter;
    use std::fs;
    use tempfile::TempDir;

    fn web_doc(content: &str, url: &str) -> RawDocument {
        RawDocument::new(content, SourceType::WebNews, url)
    }

    #[test]
    fn test_process_document() {
        let doc = web_doc(
            "<p>Os focos de calor aumentaram no Pantanal.</p>\n<p>Veja</p>\nO INPE monitora o fogo por satélite.",
            "https://g1.globo.com/a/fogo.ghtml",
        );
        let out = process_document(&doc, &RuleSegmenter::new(), &BatchOptions::default()).unwrap();
        assert_eq!(out.sentences.source_name, "WEB_g1_globo_com_fogo");
        assert_eq!(
            out.sentences.sentences,
            vec![
                "Os focos de calor aumentaram no Pantanal.",
                "Veja O INPE monitora o fogo por satélite."
            ]
        );
        assert_eq!(out.rejected(), 0);
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let doc = web_doc("   ", "https://x.org/a");
        let err = process_document(&doc, &RuleSegmenter::new(), &BatchOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[test]
    fn test_all_rejected_yields_empty_file() {
        let doc = web_doc("lixo sem ponto", "https://x.org/a");
        let out = process_document(&doc, &RuleSegmenter::new(), &BatchOptions::default()).unwrap();
        assert!(out.sentences.is_empty());
        assert_eq!(out.candidates, 1);
    }

    #[test]
    fn test_process_documents_preserves_order() {
        let docs: Vec<RawDocument> = (0..20)
            .map(|i| {
                web_doc(
                    &format!("O fogo número {} atingiu a floresta nativa.", i),
                    &format!("https://site.org/n{}", i),
                )
            })
            .collect();
        let parallel = process_documents(&docs, &RuleSegmenter::new(), &BatchOptions::default());
        let sequential =
            process_documents(&docs, &RuleSegmenter::new(), &BatchOptions::sequential());
        let names = |results: &[Result<ProcessedDocument>]| -> Vec<String> {
            results
                .iter()
                .map(|r| r.as_ref().unwrap().sentences.source_name.clone())
                .collect()
        };
        assert_eq!(names(&parallel), names(&sequential));
        assert_eq!(names(&parallel)[3], "WEB_site_org_n3");
    }

    #[test]
    fn test_failure_isolation() {
        let docs = vec![
            web_doc("", "https://a.org/vazio"),
            web_doc("A queimada destruiu a mata ciliar.", "https://a.org/ok"),
        ];
        let results = process_documents(&docs, &RuleSegmenter::new(), &BatchOptions::default());
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().sentences.len(), 1);
    }

    #[test]
    fn test_process_and_save() {
        let dir = TempDir::new().unwrap();
        let docs = vec![
            web_doc("A queimada destruiu a mata ciliar.", "https://a.org/ok"),
            web_doc("", "https://a.org/vazio"),
            web_doc("nada aqui", "https://a.org/ruim"),
        ];
        let report = process_and_save(
            &docs,
            &RuleSegmenter::new(),
            &BatchOptions::sequential(),
            dir.path(),
        )
        .unwrap();

        assert_eq!(report.documents, 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.empty, 1);
        assert_eq!(report.sentences, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "WEB_a_org_vazio");
        assert_eq!(
            fs::read_to_string(&report.files[0]).unwrap(),
            "A queimada destruiu a mata ciliar.\n"
        );
    }

    #[test]
    fn test_cleanup_override() {
        let doc = web_doc("UNIVERSIDADE FEDERAL\nO fogo consumiu a vegetação nativa.", "x");
        let options = BatchOptions::sequential().with_cleanup(CleanupOptions::default());
        let out = process_document(&doc, &RuleSegmenter::new(), &options).unwrap();
        assert_eq!(out.sentences.sentences, vec!["O fogo consumiu a vegetação nativa."]);
    }
}
