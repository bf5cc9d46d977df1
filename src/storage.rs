//! Reading raw inputs and writing sentence files.
//!
//! Inputs are read as UTF-8 with a Windows-1252 fallback for legacy exports.
//! Sentence files are named `{source}_corpus_{YYYYmmdd_HHMMSS}.txt`, where the
//! source name is derived from the document URL or filename.

use crate::error::{Error, Result};
use crate::model::{RawDocument, SentenceFile, SourceType};
use chrono::{DateTime, Local};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Maximum characters kept from the last URL path segment.
pub const MAX_SLUG_CHARS: usize = 30;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Reads a text file, falling back to Windows-1252 when it is not valid UTF-8.
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(decode_bytes(bytes))
}

/// Decodes raw bytes, preferring UTF-8.
pub fn decode_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            let (text, _, had_errors) = WINDOWS_1252.decode(&bytes);
            debug!(had_errors, "input is not UTF-8, decoded as Windows-1252");
            text.into_owned()
        }
    }
}

/// Loads a raw document from a collector record (`.json`) or a plain text file.
///
/// For plain text the caller supplies the source type and the file name
/// becomes the origin. Records carry their own source type.
pub fn load_document(path: impl AsRef<Path>, source_type: SourceType) -> Result<RawDocument> {
    let path = path.as_ref();
    let text = read_text(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return RawDocument::from_json(&text);
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RawDocument::new(text, source_type, file_name))
}

// ============================================================================
// Source naming
// ============================================================================

/// Derives the source name for a document origin.
///
/// - web: `WEB_{domain}_{slug}`
/// - dashboard: `DASH_{domain}`
/// - PDF: file stem with spaces replaced by underscores
///
/// Web and dashboard origins that are not URLs fall back to the file stem.
///
/// # Example
///
/// ```
/// use descreve::storage::source_name;
/// use descreve::SourceType;
///
/// assert_eq!(
///     source_name("https://www.ipam.org.br/noticia/fogo-na-amazonia.html", SourceType::WebNews),
///     "WEB_ipam_org_br_fogo-na-amazonia"
/// );
/// assert_eq!(source_name("Nota Técnica 5.pdf", SourceType::PdfDocument), "Nota_Técnica_5");
/// ```
pub fn source_name(origin: &str, source_type: SourceType) -> String {
    let origin = origin.trim();
    match (source_type, split_url(origin)) {
        (SourceType::WebNews, Some((host, path))) => {
            format!("WEB_{}_{}", domain_key(host), url_slug(path))
        }
        (SourceType::DynamicDashboard, Some((host, _))) => format!("DASH_{}", domain_key(host)),
        (SourceType::WebNews, None) => format!("WEB_{}", file_source_name(origin)),
        (SourceType::DynamicDashboard, None) => format!("DASH_{}", file_source_name(origin)),
        (SourceType::PdfDocument, _) => file_source_name(origin),
    }
}

/// Splits `scheme://host/path?query` into host and path.
fn split_url(origin: &str) -> Option<(&str, &str)> {
    let (_, rest) = origin.split_once("://")?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    Some(rest.split_once('/').unwrap_or((rest, "")))
}

fn domain_key(host: &str) -> String {
    host.trim_start_matches("www.").replace(['.', ':'], "_")
}

fn url_slug(path: &str) -> String {
    let segment = path
        .split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .unwrap_or("index");
    let truncated: String = segment.chars().take(MAX_SLUG_CHARS).collect();
    truncated
        .replace(".html", "")
        .replace(".ghtml", "")
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn file_source_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().replace(' ', "_"))
        .unwrap_or_default();
    if stem.is_empty() {
        "unknown".to_string()
    } else {
        stem
    }
}

/// Sentence-file name for a source at the given time.
pub fn sentence_file_name(source_name: &str, at: &DateTime<Local>) -> String {
    format!("{}_corpus_{}.txt", source_name, at.format(TIMESTAMP_FORMAT))
}

/// Raw-record file name for a source at the given time.
pub fn raw_record_name(source_name: &str, at: &DateTime<Local>) -> String {
    format!("{}_{}.json", source_name, at.format(TIMESTAMP_FORMAT))
}

/// Appends `_1`, `_2`, ... to the stem until the path is free.
fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let path = Path::new(file_name);
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let ext = path.extension().map(|s| s.to_string_lossy()).unwrap_or_default();
    (1..)
        .map(|n| dir.join(format!("{}_{}.{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

// ============================================================================
// Writing
// ============================================================================

/// Writes a sentence file into `dir` and returns its path.
///
/// Empty sentence files are still created, with a warning.
pub fn write_sentence_file(dir: impl AsRef<Path>, file: &SentenceFile) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::write_failure(dir, e))?;

    let path = unique_path(dir, &sentence_file_name(&file.source_name, &Local::now()));
    fs::write(&path, file.to_text()).map_err(|e| Error::write_failure(&path, e))?;

    if file.is_empty() {
        warn!(source = %file.source_name, path = %path.display(), "every sentence rejected, wrote empty file");
    } else {
        info!(source = %file.source_name, sentences = file.len(), path = %path.display(), "sentence file saved");
    }
    Ok(path)
}

/// Archives the raw collector record as pretty-printed JSON.
pub fn write_raw_record(dir: impl AsRef<Path>, doc: &RawDocument) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::write_failure(dir, e))?;

    let path = unique_path(dir, &raw_record_name(&doc.source_name(), &Local::now()));
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(&path, json).map_err(|e| Error::write_failure(&path, e))?;
    debug!(path = %path.display(), "raw record saved");
    Ok(path)
}

/// Writes lines, one per line, creating the parent directory.
pub fn write_lines<S: AsRef<str>>(path: impl AsRef<Path>, lines: &[S]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::write_failure(parent, e))?;
    }

    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    fs::write(path, out).map_err(|e| Error::write_failure(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_web_source_names() {
        assert_eq!(
            source_name(
                "https://g1.globo.com/meio-ambiente/noticia/2024/09/queimadas.ghtml",
                SourceType::WebNews
            ),
            "WEB_g1_globo_com_queimadas"
        );
        assert_eq!(
            source_name("https://www.wwf.org.br/", SourceType::WebNews),
            "WEB_wwf_org_br_index"
        );
        assert_eq!(
            source_name(
                "https://site.org/noticias/um-titulo-muito-longo-para-caber-no-nome.html",
                SourceType::WebNews
            ),
            "WEB_site_org_um-titulo-muito-longo-para-cab"
        );
        assert_eq!(
            source_name("https://site.org/busca?q=fogo", SourceType::WebNews),
            "WEB_site_org_busca"
        );
    }

    #[test]
    fn test_dashboard_source_name() {
        assert_eq!(
            source_name(
                "https://terrabrasilis.dpi.inpe.br/app/dashboard/fires/biomes/aggregated/",
                SourceType::DynamicDashboard
            ),
            "DASH_terrabrasilis_dpi_inpe_br"
        );
    }

    #[test]
    fn test_non_url_web_origin() {
        assert_eq!(source_name("noticia fogo.txt", SourceType::WebNews), "WEB_noticia_fogo");
        assert_eq!(source_name("", SourceType::PdfDocument), "unknown");
    }

    #[test]
    fn test_timestamped_names() {
        let at = Local.with_ymd_and_hms(2024, 8, 15, 9, 5, 3).unwrap();
        assert_eq!(
            sentence_file_name("WEB_g1_globo_com_fogo", &at),
            "WEB_g1_globo_com_fogo_corpus_20240815_090503.txt"
        );
        assert_eq!(raw_record_name("relatorio", &at), "relatorio_20240815_090503.json");
    }

    #[test]
    fn test_decode_bytes_fallback() {
        assert_eq!(decode_bytes("área".as_bytes().to_vec()), "área");
        // "área" in Windows-1252
        assert_eq!(decode_bytes(vec![0xE1, b'r', b'e', b'a']), "área");
    }

    #[test]
    fn test_read_text_missing() {
        let dir = TempDir::new().unwrap();
        let err = read_text(dir.path().join("nada.txt")).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }

    #[test]
    fn test_load_document_text_and_json() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("relatorio anual.txt");
        fs::write(&txt, "O fogo avançou.").unwrap();
        let doc = load_document(&txt, SourceType::PdfDocument).unwrap();
        assert_eq!(doc.source_name(), "relatorio_anual");
        assert_eq!(doc.content, "O fogo avançou.");

        let json = dir.path().join("registro.json");
        fs::write(
            &json,
            r#"{"url": "https://g1.globo.com/a/b.ghtml", "content": "x", "source_type": "web_news"}"#,
        )
        .unwrap();
        let doc = load_document(&json, SourceType::PdfDocument).unwrap();
        assert_eq!(doc.source_type, SourceType::WebNews);
        assert_eq!(doc.source_name(), "WEB_g1_globo_com_b");
    }

    #[test]
    fn test_write_sentence_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("corpus");
        let file = SentenceFile::new("DASH_x", vec!["Uma frase sobre o fogo.".into()]);

        let first = write_sentence_file(&out, &file).unwrap();
        let second = write_sentence_file(&out, &file).unwrap();
        assert_ne!(first, second);

        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("DASH_x_corpus_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "Uma frase sobre o fogo.\n");
    }

    #[test]
    fn test_write_empty_sentence_file() {
        let dir = TempDir::new().unwrap();
        let path = write_sentence_file(dir.path(), &SentenceFile::new("vazio", Vec::new())).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_write_raw_record() {
        let dir = TempDir::new().unwrap();
        let doc = RawDocument::new("texto", SourceType::PdfDocument, "nota.pdf");
        let path = write_raw_record(dir.path(), &doc).unwrap();
        let back = RawDocument::from_json(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_write_lines_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/final.txt");
        write_lines(&path, &["um", "dois"]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "um\ndois\n");
    }
}
