use crate::PageRange;
use crate::regex::Regex;
use compact_str::CompactString;
use std::sync::LazyLock;

static DOI_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(?:dx\.)?doi\.org/(.+)$").unwrap());

static DOI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^10\.\d{4,9}/\S+$").unwrap());

/// Collapses internal whitespace runs to a single space and trims the ends.
///
/// Idempotent: applying it to its own output is a no-op.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Formats a DOI string by removing URL prefixes, `doi:` markers, and
/// `[doi]` suffixes, lower-casing the result and stripping a trailing period.
///
/// Returns `None` when no `10.`-prefixed value can be located at all; the
/// caller decides whether that is a missing field or an invalid one.
pub(crate) fn format_doi(doi_str: &str) -> Option<String> {
    if doi_str.is_empty() {
        return None;
    }
    let doi = doi_str
        .trim()
        .trim_end_matches("[doi]")
        .trim()
        .replace(|c: char| c.is_whitespace(), "")
        .to_lowercase();

    // Find the first occurrence of "10." which typically starts a DOI
    if let Some(pos) = doi.find("10.") {
        let doi = &doi[pos..];
        let bare = if let Some(captures) = DOI_URL_REGEX.captures(doi) {
            captures[1].to_string()
        } else {
            doi.to_string()
        };
        Some(bare.trim_end_matches('.').to_string())
    } else {
        None
    }
}

/// Whether a (already formatted) DOI matches the registrant/suffix pattern.
pub(crate) fn is_valid_doi(doi: &str) -> bool {
    DOI_PATTERN.is_match(doi)
}

/// Parses a page range such as "71-82", "1-3", or a single page "612".
///
/// Both sides must be numeric; anything else (roman numerals, article
/// numbers like "e071674") yields `None`.  A single page N becomes the
/// degenerate range N-N.  En and em dashes are accepted as separators.
pub(crate) fn parse_page_range(pages: &str) -> Option<PageRange> {
    let pages = pages.trim();
    if pages.is_empty() {
        return None;
    }

    let mut parts = pages.splitn(2, ['-', '\u{2013}', '\u{2014}']);
    let start: u32 = parts.next()?.trim().parse().ok()?;
    match parts.next() {
        Some(end) => {
            let end: u32 = end.trim().parse().ok()?;
            Some(PageRange { start, end })
        }
        None => Some(PageRange {
            start,
            end: start,
        }),
    }
}

/// Extracts a publication year from one comma-delimited token.
///
/// The year must be the token's final whitespace-separated word, exactly four
/// digits in a plausible range; any preceding words (month abbreviations in
/// the common "Jan. 2022" style) must be digit-free.  Tokens like
/// "2023 IEEE MTT-S International Microwave Symposium (IMS)" therefore do
/// not count: their year is not in final position.
pub(crate) fn year_of_token(token: &str) -> Option<i32> {
    let mut words = token.split_whitespace().rev();
    let last = words.next()?;
    if last.len() != 4 || !last.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if words.any(|w| w.contains(|c: char| c.is_ascii_digit())) {
        return None;
    }
    let year: i32 = last.parse().ok()?;
    (1500..=2100).contains(&year).then_some(year)
}

/// Case-insensitive, alphanumeric-only comparison key.
///
/// Used wherever two strings must be compared "ignoring case, whitespace,
/// and punctuation": duplicate-detection title keys, author-name set
/// elements, and venue-table lookups.
pub(crate) fn comparison_key(text: &str) -> CompactString {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
