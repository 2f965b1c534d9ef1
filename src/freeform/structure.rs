//! Intermediate data for free-text extraction and the record-building pass.
//!
//! [`RawCitationData`] holds the raw substrings the tokenizer carved out of
//! one line; `TryFrom<RawCitationData>` normalizes them and runs the
//! validation pass, yielding an immutable [`Citation`] or a [`ParseError`].

use crate::error::{ErrorKind, ParseError, fields};
use crate::normalize::{normalize_authors, normalize_title, normalize_venue};
use crate::utils::{collapse_whitespace, format_doi, is_valid_doi, parse_page_range};
use crate::{Citation, CitationKind};

/// Raw field substrings extracted from one citation line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawCitationData {
    /// Text before the opening title quote, trailing separators removed.
    pub(crate) authors: String,
    /// Text between the title quotes, trailing comma still attached.
    pub(crate) title: String,
    /// Leading venue-block tokens rejoined.
    pub(crate) venue: String,
    /// Digit-free tokens preceding the year token, if any.
    pub(crate) location: Option<String>,
    /// Standalone 4-digit year, if one was found in the block.
    pub(crate) year: Option<i32>,
    /// Value of a "vol. N" token.
    pub(crate) volume: Option<String>,
    /// Value of a "no. M" token.
    pub(crate) issue: Option<String>,
    /// Value of a "pp. N-M" token, unparsed.
    pub(crate) pages: Option<String>,
    /// Text after the final "doi:" marker.
    pub(crate) doi: String,
    /// Kind classification from the block's shape.
    pub(crate) kind: CitationKind,
}

impl TryFrom<RawCitationData> for Citation {
    type Error = ParseError;

    fn try_from(raw: RawCitationData) -> Result<Self, Self::Error> {
        let authors = normalize_authors(&raw.authors);
        if authors.is_empty() {
            return Err(missing(fields::AUTHORS));
        }

        let title = normalize_title(&raw.title);
        if title.is_empty() {
            return Err(missing(fields::TITLE));
        }

        let venue = normalize_venue(&raw.venue);
        if venue.is_empty() {
            return Err(missing(fields::VENUE));
        }

        let year = raw.year.ok_or_else(|| missing(fields::YEAR))?;

        let doi = match format_doi(&raw.doi) {
            None if raw.doi.trim().is_empty() => return Err(missing(fields::DOI)),
            None => return Err(invalid_doi(&raw.doi)),
            Some(doi) if !is_valid_doi(&doi) => return Err(invalid_doi(&doi)),
            Some(doi) => doi,
        };

        Ok(Citation {
            authors,
            title,
            venue,
            location: raw
                .location
                .as_deref()
                .map(collapse_whitespace)
                .filter(|l| !l.is_empty()),
            year,
            volume: raw.volume.filter(|v| !v.is_empty()),
            issue: raw.issue.filter(|v| !v.is_empty()),
            pages: raw.pages.as_deref().and_then(parse_page_range),
            doi,
            kind: raw.kind,
            canonical_id: None,
        })
    }
}

fn missing(field: &'static str) -> ParseError {
    ParseError::without_position(ErrorKind::MissingField { field })
}

fn invalid_doi(value: &str) -> ParseError {
    ParseError::without_position(ErrorKind::InvalidDoi {
        value: value.trim().to_string(),
    })
}
