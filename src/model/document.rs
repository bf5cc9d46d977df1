//! Raw documents as delivered by the collectors.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a raw document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// News article or institutional web page
    WebNews,
    /// Text extracted from a PDF (possibly OCR)
    PdfDocument,
    /// Rendered monitoring dashboard
    DynamicDashboard,
}

impl SourceType {
    /// All source types, in declaration order.
    pub const ALL: [SourceType; 3] = [
        SourceType::WebNews,
        SourceType::PdfDocument,
        SourceType::DynamicDashboard,
    ];

    /// Wire name used in collector records.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::WebNews => "web_news",
            SourceType::PdfDocument => "pdf_document",
            SourceType::DynamicDashboard => "dynamic_dashboard",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SourceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown source type: {}", s))
    }
}

/// A captured document before any cleanup.
///
/// Collector records deserialize directly into this type; unknown fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Extracted text
    #[serde(alias = "raw_content")]
    pub content: String,
    /// Collector that produced the text
    pub source_type: SourceType,
    /// URL (web, dashboard) or file name (PDF)
    #[serde(default, rename = "url", alias = "filename", alias = "url_or_filename")]
    pub origin: Option<String>,
    /// Document title, when the collector found one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Author metadata (PDF collector)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication or extraction date as reported by the collector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl RawDocument {
    /// Creates a document from text and its origin.
    pub fn new(
        content: impl Into<String>,
        source_type: SourceType,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            source_type,
            origin: Some(origin.into()),
            title: None,
            author: None,
            date: None,
        }
    }

    /// Parses a collector record.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Source name used for sentence-file naming.
    ///
    /// Falls back to `unknown` when the collector did not record an origin.
    pub fn source_name(&self) -> String {
        match self.origin.as_deref() {
            Some(origin) if !origin.trim().is_empty() => {
                crate::storage::source_name(origin, self.source_type)
            }
            _ => format!("{}_unknown", self.source_type),
        }
    }

    /// Returns an error if there is no text to process.
    pub fn ensure_content(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(Error::malformed(self.source_name(), "empty content"));
        }
        Ok(())
    }
}
