//! Free-text citation line parser.
//!
//! Parses the single-line citation style found in hand-maintained
//! publication lists:
//!
//! ```text
//! AUTHORS, "TITLE," VENUE[, LOCATION], YEAR, pp. PAGES, doi: DOI.
//! ```
//!
//! Extraction is anchor-based rather than grammar-based: the quoted title
//! span is located first (author lists and venue names never contain
//! quotes), then the trailing `doi:` marker, and only then is the residual
//! venue block split into fields.  A line missing either anchor fails as a
//! whole; no partial record is emitted.
//!
//! # Example
//!
//! ```
//! use citeline::{CitationParser, FreeformParser};
//!
//! let line = r#"C. Li and J. Lin, "Recent Advances in Doppler Radar Sensors for Noncontact Healthcare Monitoring," IEEE Trans. Microw. Theory Techn., vol. 61, no. 5, pp. 2046-2060, May 2013, doi: 10.1109/TMTT.2013.2256924."#;
//!
//! let citation = FreeformParser::new().parse_line(line).unwrap();
//! assert_eq!(citation.authors.len(), 2);
//! assert_eq!(citation.doi, "10.1109/tmtt.2013.2256924");
//! ```

mod parse;
mod structure;

use crate::error::ParseError;
use crate::{Citation, CitationParser};
use parse::extract_line;

/// Parser for free-text, one-line citations.
///
/// Implements [`CitationParser`] so the ingestion engine (or a caller) can
/// parse lines one at a time.  Stateless and cheap to construct.
#[derive(Debug, Clone, Default)]
pub struct FreeformParser;

impl FreeformParser {
    /// Creates a new free-text parser instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CitationParser for FreeformParser {
    /// Parses a single citation line into a [`Citation`].
    ///
    /// # Errors
    ///
    /// Returns `ParseError` with kind `UnrecognizedFormat` when a required
    /// anchor is missing, `MissingField` when a required field normalizes to
    /// empty, or `InvalidDoi` when the DOI fails the pattern check.  The
    /// returned error carries no line number; callers that know it should
    /// attach one with [`ParseError::with_line`].
    fn parse_line(&self, line: &str) -> Result<Citation, ParseError> {
        let raw = extract_line(line)?;
        raw.try_into()
    }
}
