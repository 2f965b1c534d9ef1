//! Field normalization.
//!
//! Best-effort canonicalization of raw field substrings produced by the
//! tokenizer.  Normalizers never fail: a structurally malformed value is
//! either passed through flagged as low-confidence (author names) or mapped
//! to `None` by the caller (pages).  Every string normalizer is idempotent.

use crate::Author;
use crate::utils::{collapse_whitespace, comparison_key};

/// Known venue abbreviations and their canonical long forms.
///
/// Matching is case-insensitive and punctuation-insensitive, so either the
/// abbreviated or the long form (in any casing) maps to the canonical long
/// form.  Unrecognized venues pass through with whitespace collapsed.
const VENUE_CANONICAL: &[(&str, &str)] = &[
    (
        "IEEE Trans. Microw. Theory Techn.",
        "IEEE Transactions on Microwave Theory and Techniques",
    ),
    (
        "IEEE Microw. Wireless Compon. Lett.",
        "IEEE Microwave and Wireless Components Letters",
    ),
    ("IEEE Sens. J.", "IEEE Sensors Journal"),
    (
        "IEEE Trans. Instrum. Meas.",
        "IEEE Transactions on Instrumentation and Measurement",
    ),
    ("IEEE Internet Things J.", "IEEE Internet of Things Journal"),
    (
        "IEEE Trans. Biomed. Eng.",
        "IEEE Transactions on Biomedical Engineering",
    ),
    (
        "IEEE Trans. Antennas Propag.",
        "IEEE Transactions on Antennas and Propagation",
    ),
    (
        "IEEE J. Electromagn. RF Microw. Med. Biol.",
        "IEEE Journal of Electromagnetics, RF and Microwaves in Medicine and Biology",
    ),
    (
        "IEEE Trans. Circuits Syst. I Reg. Papers",
        "IEEE Transactions on Circuits and Systems I: Regular Papers",
    ),
];

/// Normalizes a raw title: trims trailing commas/quotes left over from the
/// quoted span and collapses internal whitespace runs.  Casing is preserved.
pub(crate) fn normalize_title(raw: &str) -> String {
    let trimmed = raw
        .trim()
        .trim_end_matches(|c: char| c == ',' || c == '"' || c == '\u{201d}' || c.is_whitespace());
    collapse_whitespace(trimmed)
}

/// Normalizes a raw venue string.
///
/// Collapses whitespace, drops the "in" connective common in conference
/// references ("in 2021 IEEE Sensors"), and substitutes the canonical long
/// form when the result matches a known abbreviation.
pub(crate) fn normalize_venue(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw.trim().trim_end_matches(['.', ',']));
    let collapsed = collapsed
        .strip_prefix("in ")
        .or_else(|| collapsed.strip_prefix("In "))
        .unwrap_or(&collapsed);

    let key = comparison_key(collapsed);
    for (abbr, full) in VENUE_CANONICAL {
        if key == comparison_key(abbr) || key == comparison_key(full) {
            return (*full).to_string();
        }
    }
    collapsed.to_string()
}

/// Splits a raw author list and normalizes each name.
///
/// The list is comma-separated, with the final author optionally introduced
/// by "and" or "&" ("C. Li, J. Wang, and X. Chen").  Commas never occur
/// inside a name in this style, so a bare comma split is safe; " and " and
/// " & " are secondary separators within a segment.
pub(crate) fn normalize_authors(raw: &str) -> Vec<Author> {
    raw.split(',')
        .flat_map(|segment| segment.split(" and ").flat_map(|s| s.split(" & ")))
        .map(str::trim)
        .map(|segment| {
            segment
                .strip_prefix("and ")
                .or_else(|| segment.strip_prefix("& "))
                .or_else(|| segment.strip_prefix('&'))
                .unwrap_or(segment)
                .trim()
        })
        .filter(|segment| !segment.is_empty() && *segment != "and" && *segment != "&")
        .map(parse_author)
        .collect()
}

/// Parses one author segment into an [`Author`].
///
/// "J. -F. Mao" becomes family "Mao" with given initials "J. -F.".  A
/// single-word segment with no family/given structure (a first-name-only
/// fragment such as "Jinjing") is kept verbatim but flagged low-confidence
/// rather than guessed at.
pub(crate) fn parse_author(segment: &str) -> Author {
    let words: Vec<&str> = segment.split_whitespace().collect();
    match words.as_slice() {
        [] => Author {
            name: String::new(),
            given_name: None,
            low_confidence: true,
        },
        [only] => Author {
            name: (*only).to_string(),
            given_name: None,
            low_confidence: true,
        },
        [given @ .., family] => Author {
            name: (*family).to_string(),
            given_name: Some(given.join(" ")),
            low_confidence: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("Audio Recovery via Noncontact Vibration Detection,", "Audio Recovery via Noncontact Vibration Detection")]
    #[case("  A   Portable  Radar Sensor, \"", "A Portable Radar Sensor")]
    #[case("Already Normal", "Already Normal")]
    #[case("Trailing period stays.", "Trailing period stays.")]
    fn test_normalize_title(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_title(raw), expected);
    }

    #[test]
    fn test_normalize_title_idempotent() {
        let once = normalize_title("  Noncontact   Vital Sign Detection,\" ");
        assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn test_normalize_venue_canonical_form() {
        assert_eq!(
            normalize_venue("IEEE Trans. Microw. Theory Techn."),
            "IEEE Transactions on Microwave Theory and Techniques"
        );
        assert_eq!(
            normalize_venue("ieee sens. j."),
            "IEEE Sensors Journal"
        );
        // The long form maps to itself, so normalization is idempotent
        let once = normalize_venue("IEEE Microw. Wireless Compon. Lett.");
        assert_eq!(normalize_venue(&once), once);
    }

    #[test]
    fn test_normalize_venue_passthrough() {
        assert_eq!(
            normalize_venue("2023 IEEE MTT-S  International Microwave Symposium (IMS)"),
            "2023 IEEE MTT-S International Microwave Symposium (IMS)"
        );
        assert_eq!(
            normalize_venue("in 2021 IEEE Sensors"),
            "2021 IEEE Sensors"
        );
    }

    #[test]
    fn test_normalize_authors_list() {
        let authors = normalize_authors("C. Li, J. Wang, and X. Chen");
        assert_eq!(authors.len(), 3);
        assert_eq!(authors[0].name, "Li");
        assert_eq!(authors[0].given_name.as_deref(), Some("C."));
        assert_eq!(authors[2].name, "Chen");
        assert!(authors.iter().all(|a| !a.low_confidence));
    }

    #[test]
    fn test_normalize_authors_ampersand() {
        let authors = normalize_authors("Y. Rong & D. Mishra");
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Rong");
        assert_eq!(authors[1].name, "Mishra");

        let authors_comma = normalize_authors("Y. Rong, & D. Mishra");
        assert_eq!(authors_comma.len(), 2);
        assert_eq!(authors_comma[1].name, "Mishra");
    }

    #[rstest]
    #[case("J. -F. Mao", "Mao", Some("J. -F."), false)]
    #[case("Changzhi Li", "Li", Some("Changzhi"), false)]
    #[case("J.-M. Munoz-Ferreras", "Munoz-Ferreras", Some("J.-M."), false)]
    #[case("Jinjing", "Jinjing", None, true)]
    fn test_parse_author(
        #[case] segment: &str,
        #[case] family: &str,
        #[case] given: Option<&str>,
        #[case] low_confidence: bool,
    ) {
        let author = parse_author(segment);
        assert_eq!(author.name, family);
        assert_eq!(author.given_name.as_deref(), given);
        assert_eq!(author.low_confidence, low_confidence);
    }

    #[test]
    fn test_normalize_authors_flags_fragment() {
        let authors = normalize_authors("Jinjing, C. Li");
        assert_eq!(authors.len(), 2);
        assert!(authors[0].low_confidence);
        assert!(!authors[1].low_confidence);
    }

    #[test]
    fn test_normalize_authors_empty() {
        assert!(normalize_authors("").is_empty());
        assert!(normalize_authors(" , ,").is_empty());
    }
}
