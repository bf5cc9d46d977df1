//! # Cleanup Pipeline
//!
//! A 5-stage pipeline turning raw extracted text into normalized prose ready
//! for sentence segmentation.
//!
//! ## Pipeline Stages
//!
//! 1. **Stage 1: Repair** - Mojibake table, control characters, NFC
//! 2. **Stage 2: Structure** - Hyphenation, TOC leaders, page markers (web: markup, broken words, number dots)
//! 3. **Stage 3: Reference Truncation** - Cut trailing bibliographies
//! 4. **Stage 4: Noise Stripping** - Rule groups, line filter, citations (web: journalistic/garbage groups and fixups)
//! 5. **Stage 5: Normalization** - Spacing, punctuation, whitespace collapse
//!
//! Structure rules run before truncation because the metadata group deletes
//! the text after a bibliography header, which would erase the marker the
//! truncator looks for.

use crate::model::SourceType;
use crate::narrative::{LineFilter, LineFilterMode};
use crate::{normalize, references, repair, rules};

/// Which family of rules a cleanup run applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupProfile {
    /// PDF text: academic front matter, contacts, tables, line filter.
    #[default]
    Document,
    /// News pages and dashboards: markup, journalistic noise, web garbage.
    Web,
}

impl From<SourceType> for CleanupProfile {
    fn from(source_type: SourceType) -> Self {
        match source_type {
            SourceType::PdfDocument => CleanupProfile::Document,
            SourceType::WebNews | SourceType::DynamicDashboard => CleanupProfile::Web,
        }
    }
}

/// Cleanup configuration options
#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// Rule family to apply
    pub profile: CleanupProfile,
    /// Enable Stage 1: Encoding and control repair
    pub repair: bool,
    /// Enable Stage 2: Structural rules
    pub strip_structure: bool,
    /// Enable Stage 3: Reference-section truncation
    pub truncate_references: bool,
    /// Enable Stage 4: Noise rule groups
    pub strip_noise: bool,
    /// Drop non-narrative lines during Stage 4
    pub filter_lines: bool,
    /// Enable Stage 5: Punctuation and spacing normalization
    pub final_normalize: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            profile: CleanupProfile::Document,
            repair: true,
            strip_structure: true,
            truncate_references: true,
            strip_noise: true,
            filter_lines: true,
            final_normalize: true,
        }
    }
}

impl CleanupOptions {
    /// Creates the full pipeline for the given source type.
    pub fn for_source(source_type: SourceType) -> Self {
        Self::default().with_profile(source_type.into())
    }

    /// Full pipeline with the web rule family.
    pub fn web() -> Self {
        Self::default().with_profile(CleanupProfile::Web)
    }

    /// Creates options for minimal cleanup (repair and normalization only)
    pub fn minimal() -> Self {
        Self {
            strip_structure: false,
            truncate_references: false,
            strip_noise: false,
            filter_lines: false,
            ..Self::default()
        }
    }

    /// Sets the rule family.
    pub fn with_profile(mut self, profile: CleanupProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Keeps reference sections.
    pub fn without_truncation(mut self) -> Self {
        self.truncate_references = false;
        self
    }

    /// Keeps every line that survives the rule groups.
    pub fn without_line_filter(mut self) -> Self {
        self.filter_lines = false;
        self
    }

    fn line_filter(&self) -> LineFilter {
        match self.profile {
            CleanupProfile::Document => LineFilter::new(LineFilterMode::Full),
            CleanupProfile::Web => LineFilter::new(LineFilterMode::Citations),
        }
    }
}

// ============================================================================
// Stage 1: Repair
// ============================================================================

/// Stage 1: Fix mojibake, strip control characters, compose to NFC
pub fn stage1_repair(input: &str, _options: &CleanupOptions) -> String {
    repair::repair(input)
}

// ============================================================================
// Stage 2: Structure
// ============================================================================

/// Stage 2: Remove layout artifacts that must go before truncation
///
/// Documents get the `structure` rule group. Web text gets markup removal,
/// hyphen-space joins and thousands-dot removal.
pub fn stage2_strip_structure(input: &str, options: &CleanupOptions) -> String {
    match options.profile {
        CleanupProfile::Document => rules::STRUCTURE.apply(input),
        CleanupProfile::Web => {
            let text = rules::MARKUP.apply(input);
            let text = normalize::fix_broken_words(&text);
            normalize::normalize_numbers(&text)
        }
    }
}

// ============================================================================
// Stage 3: Reference Truncation
// ============================================================================

/// Stage 3: Cut the bibliography
pub fn stage3_truncate(input: &str, _options: &CleanupOptions) -> String {
    references::truncate(input)
}

// ============================================================================
// Stage 4: Noise Stripping
// ============================================================================

/// Stage 4: Apply the remaining rule groups and the line filter
pub fn stage4_strip_noise(input: &str, options: &CleanupOptions) -> String {
    match options.profile {
        CleanupProfile::Document => {
            let mut text = rules::apply_groups(
                input,
                [
                    &*rules::ACADEMIC_FRONT_MATTER,
                    &*rules::METADATA,
                    &*rules::CONTACTS,
                    &*rules::TABLES_AND_FIGURES,
                    &*rules::NAVIGATION_JUNK,
                ],
            );
            if options.filter_lines {
                text = options.line_filter().apply(&text);
            }
            rules::CITATIONS.apply(&text)
        }
        CleanupProfile::Web => {
            let mut text = rules::apply_groups(
                input,
                [
                    &*rules::JOURNALISTIC,
                    &*rules::FIGURE_REFERENCES,
                    &*rules::WEB_GARBAGE,
                ],
            );
            // Bullets go first so a bulleted citation line is seen by the filter.
            text = normalize::remove_sidebar_intrusions(&text);
            if options.filter_lines {
                text = options.line_filter().apply(&text);
            }
            let text = rules::ACADEMIC_NOISE.apply(&text);
            let text = normalize::repair_malformed_citations(&text);
            normalize::fix_sticky_suffixes(&text)
        }
    }
}

// ============================================================================
// Stage 5: Normalization
// ============================================================================

/// Stage 5: Spacing and punctuation normalization, whitespace collapse
pub fn stage5_normalize(input: &str, _options: &CleanupOptions) -> String {
    normalize::normalize(input)
}

// ============================================================================
// Main Cleanup Function
// ============================================================================

/// Run the complete cleanup pipeline
///
/// # Example
///
/// ```
/// use descreve::cleanup::{cleanup, CleanupOptions};
/// use descreve::SourceType;
///
/// let raw = "<p>IPAMamazonia detectou 500 focos de incêndio na Amazônia.</p>";
/// let clean = cleanup(raw, &CleanupOptions::for_source(SourceType::WebNews));
/// assert_eq!(clean, "detectou 500 focos de incêndio na Amazônia.");
/// ```
pub fn cleanup(input: &str, options: &CleanupOptions) -> String {
    let mut result = input.to_string();

    // Stage 1: Repair
    if options.repair {
        result = stage1_repair(&result, options);
    }

    // Stage 2: Structure
    if options.strip_structure {
        result = stage2_strip_structure(&result, options);
    }

    // Stage 3: Reference truncation
    if options.truncate_references {
        result = stage3_truncate(&result, options);
    }

    // Stage 4: Noise stripping
    if options.strip_noise {
        result = stage4_strip_noise(&result, options);
    }

    // Stage 5: Normalization
    if options.final_normalize {
        result = stage5_normalize(&result, options);
    }

    result
}

/// Run cleanup with default (document) options
pub fn cleanup_default(input: &str) -> String {
    cleanup(input, &CleanupOptions::default())
}
