//! A library for parsing, normalizing, and deduplicating free-text academic citations.
//!
//! `citeline` ingests the loosely structured, one-citation-per-line lists
//! found in hand-maintained publication pages:
//!
//! ```text
//! ##### Refereed Journal Papers
//!
//! J. Zhang and J. -F. Mao, "A Compact Sensor," IEEE Trans. Microw. Theory
//! Techn., vol. 70, no. 1, pp. 71-82, Jan. 2022, doi: 10.1109/TMTT.2021.3124822.
//! ```
//!
//! Each line is parsed into a structured [`Citation`] by anchor-based
//! extraction (the quoted title first, then the trailing `doi:` marker, then
//! the residual venue block), fields are canonicalized, and near-duplicate
//! entries — typically the same paper transcribed twice with DOIs differing
//! only in suffix — are grouped and assigned a canonical representative.
//!
//! # Features
//!
//! - `dedupe` - Enable duplicate detection (enabled by default)
//! - `regex` - Use the full `regex` crate (enabled by default)
//! - `lite` - Use `regex-lite` instead (disable default features)
//! - `diagnostics` - Pretty error rendering with source context
//!
//! # Basic Usage
//!
//! ```rust
//! use citeline::{CitationParser, FreeformParser};
//!
//! let line = r#"C. Li, "A Sensor," IEEE Sensors Journal, vol. 20, no. 4, pp. 1893-1901, 2020, doi: 10.1109/JSEN.2019.2959717."#;
//!
//! let citation = FreeformParser::new().parse_line(line).unwrap();
//! assert_eq!(citation.title, "A Sensor");
//! assert_eq!(citation.year, 2020);
//! assert_eq!(citation.doi, "10.1109/jsen.2019.2959717");
//! ```
//!
//! # Ingesting a whole list
//!
//! The [`IngestionEngine`] processes a full text: blank lines and
//! `#`-prefixed section headers are skipped, every other line becomes one
//! record or one reported error, and duplicate detection runs over the
//! successes.  A malformed line never aborts the run.
//!
//! ```rust
//! use citeline::IngestionEngine;
//!
//! let input = r#"##### Conference Papers
//!
//! C. Xu and C. Li, "Audio Recovery via Vibration Detection," 2021 IEEE Sensors, Sydney, Australia, 2021, pp. 1-4, doi: 10.1109/SENSORS47087.2021.9618462.
//! C. Xu and C. Li, "Audio Recovery via Vibration Detection," 2021 IEEE Sensors, Sydney, Australia, 2021, pp. 1-4, doi: 10.1109/SENSORS47087.2021.9617945.
//! "#;
//!
//! let output = IngestionEngine::new().ingest(input);
//! assert_eq!(output.records.len(), 2);
//! assert_eq!(output.duplicate_groups.len(), 1);
//! // The lexicographically smaller DOI is canonical
//! assert_eq!(output.duplicate_groups[0].canonical, 1);
//! ```
//!
//! # Error Handling
//!
//! Per-line failures are [`ParseError`] values with a kind
//! ([`ErrorKind::UnrecognizedFormat`], [`ErrorKind::MissingField`], or
//! [`ErrorKind::InvalidDoi`]), a 1-based line number, and a byte span into
//! the source for diagnostic rendering.
//!
//! # Thread Safety
//!
//! Parsers and the engine are stateless and can be shared between threads.
//! The deduplicator optionally distributes its pairwise comparisons across
//! rayon workers; results are identical to the sequential path.

use serde::{Deserialize, Serialize};

#[cfg(feature = "dedupe")]
pub mod dedupe;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod freeform;

// Reexports
pub use engine::{IngestOutput, IngestionEngine};
pub use error::{ErrorKind, ParseError, SourceSpan};
pub use freeform::FreeformParser;

mod normalize;
mod regex;
mod utils;

/// Citation kinds distinguished by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationKind {
    /// Journal article: carries vol./no. numbering, no location.
    Journal,
    /// Conference paper: carries a location, usually a year-led venue.
    Conference,
}

impl CitationKind {
    /// Convert the kind to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationKind::Journal => "Journal",
            CitationKind::Conference => "Conference",
        }
    }
}

impl std::fmt::Display for CitationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents an author of a citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Family name (or the whole fragment for low-confidence entries).
    pub name: String,

    /// Given name or initials, when present ("J. -F." in "J. -F. Mao").
    pub given_name: Option<String>,

    /// Set when the source fragment had no family/given structure (a bare
    /// first name like "Jinjing"); the value is kept verbatim rather than
    /// guessed at, and the flag lets consumers decide what to do with it.
    pub low_confidence: bool,
}

/// An inclusive page range; a single page N is the degenerate range N-N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Represents a single citation with its normalized metadata.
///
/// Built immutably by the record builder from one input line; the only
/// post-construction mutation is the duplicate detector attaching
/// [`canonical_id`](Citation::canonical_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Authors in citation order (order is semantically meaningful).
    pub authors: Vec<Author>,
    /// Title of the work, from the quoted span.
    pub title: String,
    /// Venue name, canonicalized to its long form when recognized.
    pub venue: String,
    /// City/country for conference entries.
    pub location: Option<String>,
    /// 4-digit publication year.
    pub year: i32,
    /// Volume number (journal entries).
    pub volume: Option<String>,
    /// Issue number (journal entries).
    pub issue: Option<String>,
    /// Page range, when numeric.
    pub pages: Option<PageRange>,
    /// Digital Object Identifier in bare lowercase form (`10.xxxx/yyyy`).
    pub doi: String,
    /// Journal or conference entry.
    pub kind: CitationKind,
    /// Index of this record's duplicate-class representative; `None` until
    /// duplicate detection has run.
    pub canonical_id: Option<usize>,
}

/// A duplicate-equivalence class with at least two members.
///
/// Indices refer to positions in the record sequence the detector was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Index of the canonical representative (smallest DOI, then first seen).
    pub canonical: usize,
    /// Indices of the remaining members, in input order.
    pub duplicates: Vec<usize>,
}

/// Trait for implementing citation line parsers.
///
/// The ingestion engine is generic over this seam, so alternative line
/// formats can reuse the orchestration and duplicate detection unchanged.
pub trait CitationParser {
    /// Parse a single citation line.
    ///
    /// # Arguments
    ///
    /// * `line` - One logical line, already stripped of surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the line is malformed; the error may carry
    /// column and span information but no line number, which the caller
    /// attaches via [`ParseError::with_line`].
    fn parse_line(&self, line: &str) -> Result<Citation, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_equality() {
        let author1 = Author {
            name: "Mao".to_string(),
            given_name: Some("J. -F.".to_string()),
            low_confidence: false,
        };
        let author2 = Author {
            name: "Mao".to_string(),
            given_name: Some("J. -F.".to_string()),
            low_confidence: false,
        };
        assert_eq!(author1, author2);
    }

    #[test]
    fn test_citation_kind_display() {
        assert_eq!(format!("{}", CitationKind::Journal), "Journal");
        assert_eq!(format!("{}", CitationKind::Conference), "Conference");
    }

    #[test]
    fn test_page_range_display() {
        assert_eq!(PageRange { start: 71, end: 82 }.to_string(), "71-82");
        assert_eq!(PageRange { start: 612, end: 612 }.to_string(), "612");
    }

    #[test]
    fn test_parse_line_via_trait_object() {
        let parser: &dyn CitationParser = &FreeformParser::new();
        let citation = parser
            .parse_line(r#"C. Li, "T," IEEE Sensors Journal, vol. 1, no. 1, pp. 1-2, 2020, doi: 10.1109/JSEN.2020.0000001."#)
            .unwrap();
        assert_eq!(citation.kind, CitationKind::Journal);
    }
}
