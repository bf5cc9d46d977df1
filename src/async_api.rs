//! Async API for non-blocking corpus processing.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! descreve = { version = "0.1", features = ["async"] }
//! ```
//!
//! Cleanup, segmentation and compilation are CPU-bound, so every call runs
//! the blocking pipeline on Tokio's blocking pool.

use crate::batch::{BatchOptions, BatchReport, ProcessedDocument};
use crate::compiler::{CompileOptions, CompileReport};
use crate::error::{Error, Result};
use crate::model::{RawDocument, SourceType};
use crate::segment::RuleSegmenter;
use crate::storage;
use std::path::{Path, PathBuf};
use tokio::fs;

fn join_error(err: tokio::task::JoinError) -> Error {
    Error::Io(std::io::Error::other(err.to_string()))
}

/// Asynchronously loads a raw document.
///
/// `.json` files are parsed as collector records; anything else is read as
/// text (UTF-8, falling back to Windows-1252).
///
/// # Example
///
/// ```no_run
/// # async fn example() -> descreve::Result<()> {
/// use descreve::SourceType;
///
/// let doc = descreve::async_api::load_document("data/raw/nota.txt", SourceType::PdfDocument).await?;
/// println!("{}", doc.source_name());
/// # Ok(())
/// # }
/// ```
pub async fn load_document(path: impl AsRef<Path>, source_type: SourceType) -> Result<RawDocument> {
    let path = path.as_ref();
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    let text = storage::decode_bytes(bytes);

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return RawDocument::from_json(&text);
    }

    let origin = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RawDocument::new(text, source_type, origin))
}

/// Asynchronously cleans text with the profile matching its source type.
pub async fn clean_text(text: String, source_type: SourceType) -> Result<String> {
    tokio::task::spawn_blocking(move || crate::clean_text(&text, source_type))
        .await
        .map_err(join_error)
}

/// Asynchronously processes one document with default settings.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> descreve::Result<()> {
/// use descreve::SourceType;
///
/// let processed = descreve::async_api::process_file("data/raw/nota.txt", SourceType::PdfDocument).await?;
/// tokio::fs::write("nota.txt", processed.sentences.to_text()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn process_file(path: impl AsRef<Path>, source_type: SourceType) -> Result<ProcessedDocument> {
    let doc = load_document(path, source_type).await?;
    tokio::task::spawn_blocking(move || {
        crate::batch::process_document(&doc, &RuleSegmenter::new(), &BatchOptions::default())
    })
    .await
    .map_err(join_error)?
}

/// Asynchronously processes documents and writes their sentence files.
pub async fn process_and_save(
    docs: Vec<RawDocument>,
    options: BatchOptions,
    out_dir: impl Into<PathBuf>,
) -> Result<BatchReport> {
    let out_dir = out_dir.into();
    tokio::task::spawn_blocking(move || {
        crate::batch::process_and_save(&docs, &RuleSegmenter::new(), &options, &out_dir)
    })
    .await
    .map_err(join_error)?
}

/// Asynchronously compiles a directory of sentence files.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> descreve::Result<()> {
/// use descreve::CompileOptions;
///
/// let report = descreve::async_api::compile(
///     "data/04_training_corpus",
///     "data/final/corpus.txt",
///     CompileOptions::default(),
/// )
/// .await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub async fn compile(
    input_dir: impl Into<PathBuf>,
    output: impl Into<PathBuf>,
    options: CompileOptions,
) -> Result<CompileReport> {
    let input_dir = input_dir.into();
    let output = output.into();
    tokio::task::spawn_blocking(move || crate::compiler::compile(&input_dir, &output, &options))
        .await
        .map_err(join_error)?
}
