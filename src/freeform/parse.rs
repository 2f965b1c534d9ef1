//! Anchor-based field extraction for free-text citation lines.
//!
//! Anchors are located in priority order: the quoted title span first (the
//! most reliable boundary in this style), then the trailing `doi:` marker,
//! and finally the residual venue block between them is split on commas and
//! classified token by token.

use crate::CitationKind;
use crate::error::{ErrorKind, ParseError};
use crate::freeform::structure::RawCitationData;
use crate::regex::Regex;
use crate::utils::year_of_token;
use std::sync::LazyLock;

static DOI_ANCHOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bdoi\s*:\s*").unwrap());

/// Extracts raw field substrings from one citation line.
///
/// Fails with `UnrecognizedFormat` when the title-quote pair or the `doi:`
/// marker is missing; the whole line is rejected, never a partial record.
pub(crate) fn extract_line(line: &str) -> Result<RawCitationData, ParseError> {
    let (open_idx, title_start) = find_quote(line, 0, true).ok_or_else(|| {
        ParseError::without_position(ErrorKind::unrecognized("no quoted title anchor"))
    })?;
    let (close_idx, tail_start) = find_quote(line, title_start, false).ok_or_else(|| {
        ParseError::at_column(
            open_idx + 1,
            ErrorKind::unrecognized("unterminated title quote"),
        )
    })?;

    let authors = line[..open_idx]
        .trim()
        .trim_end_matches([',', ' '])
        .to_string();
    let title = line[title_start..close_idx].to_string();
    let tail = &line[tail_start..];

    // Anchor on the *last* doi: marker so a title mentioning "doi:" cannot
    // mislead the extractor (the title span is already excluded anyway).
    let doi_match = DOI_ANCHOR.find_iter(tail).last().ok_or_else(|| {
        ParseError::without_position(ErrorKind::unrecognized("no doi: marker"))
    })?;
    let doi = tail[doi_match.end()..].trim().to_string();

    let block = &tail[..doi_match.start()];
    let tokens: Vec<&str> = block
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    Ok(split_block(&tokens, authors, title, doi))
}

/// Finds the next title quote at or after `from`, returning its byte index
/// and the index just past it.  Both straight and typographic quotes occur
/// in hand-maintained lists.
fn find_quote(line: &str, from: usize, opening: bool) -> Option<(usize, usize)> {
    let targets: [char; 2] = if opening {
        ['"', '\u{201c}']
    } else {
        ['"', '\u{201d}']
    };
    line[from..]
        .char_indices()
        .find(|(_, c)| targets.contains(c))
        .map(|(i, c)| (from + i, from + i + c.len_utf8()))
}

/// Splits the venue block's comma tokens into venue, location, year, and
/// journal numbering, then classifies the entry kind.
fn split_block(
    tokens: &[&str],
    authors: String,
    title: String,
    doi: String,
) -> RawCitationData {
    let mut volume = None;
    let mut issue = None;
    let mut pages = None;
    for token in tokens {
        if let Some(v) = structured_value(token, &["vol.", "vol"]) {
            volume.get_or_insert(v);
        } else if let Some(v) = structured_value(token, &["no.", "no"]) {
            issue.get_or_insert(v);
        } else if let Some(v) = structured_value(token, &["pp.", "pp", "p."]) {
            pages.get_or_insert(v);
        }
    }

    // The last standalone 4-digit token is the year; "Jan. 2022" counts.
    let year_idx = tokens
        .iter()
        .rposition(|t| year_of_token(t).is_some());
    let year = year_idx.and_then(|i| year_of_token(tokens[i]));

    // Contiguous digit-free tokens immediately preceding the year are the
    // location ("San Diego, CA, USA").  Token 0 is always venue.
    let mut loc_start = year_idx.unwrap_or(tokens.len());
    if let Some(year_idx) = year_idx {
        let mut j = year_idx;
        while j > 1 && is_location_token(tokens[j - 1]) {
            j -= 1;
        }
        loc_start = j;
    }
    let location = (loc_start < year_idx.unwrap_or(0)).then(|| {
        tokens[loc_start..year_idx.unwrap_or(loc_start)].join(", ")
    });

    let venue_end = tokens
        .iter()
        .take(loc_start)
        .position(|t| is_structured_token(t) || year_of_token(t).is_some())
        .unwrap_or(loc_start);
    let venue = tokens[..venue_end].join(", ");

    let kind = classify(&venue, volume.is_some() || issue.is_some(), location.is_some());

    RawCitationData {
        authors,
        title,
        venue,
        location,
        year,
        volume,
        issue,
        pages,
        doi,
        kind,
    }
}

/// Journal entries carry vol./no. numbering; conference entries carry a
/// location and usually a year-led venue.  When both signals partially
/// apply, a found location wins for Conference, else Journal.
fn classify(venue: &str, has_numbering: bool, has_location: bool) -> CitationKind {
    if has_numbering {
        CitationKind::Journal
    } else if has_location || venue_is_edition_led(venue) {
        CitationKind::Conference
    } else {
        CitationKind::Journal
    }
}

/// Whether a venue starts with an edition marker: a 4-digit year
/// ("2023 IEEE MTT-S ...") or an ordinal ("18th European Radar Conference").
fn venue_is_edition_led(venue: &str) -> bool {
    let Some(first) = venue.split_whitespace().next() else {
        return false;
    };
    if first.len() == 4 && first.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    let digits = first.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    !digits.is_empty()
        && digits.len() < first.len()
        && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts the value of a "vol. 70"-style token, case-insensitively.
fn structured_value(token: &str, prefixes: &[&str]) -> Option<String> {
    for prefix in prefixes {
        if token.len() < prefix.len() || !token.is_char_boundary(prefix.len()) {
            continue;
        }
        let (head, rest) = token.split_at(prefix.len());
        // Require a separator so "pp" does not swallow "preprint"
        if head.eq_ignore_ascii_case(prefix) && (rest.is_empty() || rest.starts_with([' ', '\t'])) {
            return Some(rest.trim().to_string());
        }
    }
    None
}

fn is_structured_token(token: &str) -> bool {
    structured_value(token, &["vol.", "vol", "no.", "no", "pp.", "pp", "p."]).is_some()
}

/// Location tokens are digit-free and not journal numbering.
fn is_location_token(token: &str) -> bool {
    !token.contains(|c: char| c.is_ascii_digit()) && !is_structured_token(token)
}
