//! Ingestion engine.
//!
//! Drives the per-line pipeline (tokenize → normalize → build) over a whole
//! input text, collecting successes and failures separately, then runs
//! duplicate detection once over the successes.  One line's failure never
//! aborts the run: a majority-valid input still yields usable structured
//! data plus an error report.
//!
//! The engine owns no I/O.  Callers read the input however they like and
//! hand over a `&str`; a failure to read at all is therefore surfaced by
//! the caller's own I/O layer before the engine is ever involved.
//!
//! # Example
//!
//! ```
//! use citeline::IngestionEngine;
//!
//! let input = r#"##### Journal Papers
//!
//! C. Li, "A Sensor," IEEE Sensors Journal, vol. 20, no. 4, pp. 1893-1901, 2020, doi: 10.1109/JSEN.2019.2959717.
//! not a citation line
//! "#;
//!
//! let output = IngestionEngine::new().ingest(input);
//! assert_eq!(output.records.len(), 1);
//! assert_eq!(output.errors.len(), 1);
//! assert_eq!(output.errors[0].line, Some(4));
//! ```

use crate::error::{ParseError, SourceSpan};
use crate::{Citation, CitationParser, DuplicateGroup, FreeformParser};
use either::Either::{Left, Right};
use itertools::Itertools;

#[cfg(feature = "dedupe")]
use crate::dedupe::{Deduplicator, DeduplicatorConfig};

/// Result of one ingestion run.
///
/// `records` holds the successfully built citations in input order, each
/// annotated with its `canonical_id`; all indices in `duplicate_groups`
/// refer to positions in `records`, not input line numbers.  `errors` holds
/// the per-line failures, each carrying its 1-based line number and byte
/// span.
#[derive(Debug)]
pub struct IngestOutput {
    /// Successfully parsed citations, in input order.
    pub records: Vec<Citation>,
    /// Duplicate-equivalence classes with at least two members.
    pub duplicate_groups: Vec<DuplicateGroup>,
    /// Per-line parse and validation failures.
    pub errors: Vec<ParseError>,
}

/// Orchestrates ingestion of a citation list.
///
/// Generic over the [`CitationParser`] seam; defaults to the free-text
/// [`FreeformParser`].
#[derive(Debug, Clone, Default)]
pub struct IngestionEngine<P = FreeformParser> {
    parser: P,
    #[cfg(feature = "dedupe")]
    deduplicator: Deduplicator,
}

impl IngestionEngine<FreeformParser> {
    /// Creates an engine with the default free-text parser and default
    /// deduplication configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: CitationParser> IngestionEngine<P> {
    /// Creates an engine around a custom parser implementation.
    #[must_use]
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            #[cfg(feature = "dedupe")]
            deduplicator: Deduplicator::new(),
        }
    }

    /// Replaces the duplicate-detection configuration.
    #[cfg(feature = "dedupe")]
    #[must_use]
    pub fn with_dedupe_config(mut self, config: DeduplicatorConfig) -> Self {
        self.deduplicator = Deduplicator::new().with_config(config);
        self
    }

    /// Ingests a full citation list.
    ///
    /// Blank lines and `#`-prefixed section headers are inert: they advance
    /// the line counter but produce neither records nor errors.  Every other
    /// line either becomes one record or one error.
    pub fn ingest(&self, input: &str) -> IngestOutput {
        let (errors, records): (Vec<ParseError>, Vec<Citation>) = logical_lines(input)
            .partition_map(|(line_no, span, text)| match self.parser.parse_line(text) {
                Ok(citation) => Right(citation),
                Err(err) => Left(err.with_line(line_no).with_span(span)),
            });

        #[cfg(feature = "dedupe")]
        let (records, duplicate_groups) = {
            let mut records = records;
            let groups = self.deduplicator.find_duplicates(&mut records);
            (records, groups)
        };
        #[cfg(not(feature = "dedupe"))]
        let duplicate_groups = Vec::new();

        IngestOutput {
            records,
            duplicate_groups,
            errors,
        }
    }
}

/// Yields `(line_number, span, content)` for every line that should be
/// parsed, skipping blank lines and section headers.  Line numbers are
/// 1-based; spans cover the trimmed content in byte offsets of `input`.
fn logical_lines(input: &str) -> impl Iterator<Item = (usize, SourceSpan, &str)> {
    let mut offset = 0usize;
    input.split('\n').enumerate().filter_map(move |(idx, raw)| {
        let start = offset;
        offset += raw.len() + 1;

        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let lead = line.len() - line.trim_start().len();
        let span = SourceSpan::new(start + lead, start + lead + trimmed.len());
        Some((idx + 1, span, trimmed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    const INPUT: &str = r#"##### Refereed Journal Papers

J. Zhang and J. -F. Mao, "A Compact Interferometric Sensor," IEEE Trans. Microw. Theory Techn., vol. 70, no. 1, pp. 71-82, Jan. 2022, doi: 10.1109/TMTT.2021.3124822.

##### Refereed Conference Papers

C. Xu, Y. Rong, and C. Li, "Audio Recovery via Noncontact Vibration Detection," 2021 IEEE Sensors, Sydney, Australia, 2021, pp. 1-4, doi: 10.1109/SENSORS47087.2021.9618462.
C. Xu, Y. Rong, and C. Li, "Audio Recovery via Noncontact Vibration Detection," 2021 IEEE Sensors, Sydney, Australia, 2021, pp. 1-4, doi: 10.1109/SENSORS47087.2021.9617945.
Y. Rong, "A Line With No Identifier," 2020 IEEE Radar Conference, Florence, Italy, 2020, pp. 1-6.
"#;

    #[test]
    fn test_ingest_end_to_end() {
        let output = IngestionEngine::new().ingest(INPUT);

        assert_eq!(output.records.len(), 3);
        assert_eq!(output.errors.len(), 1);

        // The malformed line is reported with its line number, and its
        // failure does not disturb the surrounding records.
        let err = &output.errors[0];
        assert_eq!(err.line, Some(9));
        assert!(matches!(err.kind, ErrorKind::UnrecognizedFormat { .. }));

        // The two DOI-suffix variants form one class; the smaller DOI wins.
        assert_eq!(output.duplicate_groups.len(), 1);
        let group = &output.duplicate_groups[0];
        assert_eq!(group.canonical, 2);
        assert_eq!(group.duplicates, vec![1]);
        assert_eq!(output.records[1].canonical_id, Some(2));
        assert_eq!(output.records[2].canonical_id, Some(2));
        assert_eq!(output.records[0].canonical_id, Some(0));
    }

    #[test]
    fn test_headers_and_blanks_are_inert() {
        let output = IngestionEngine::new().ingest("##### Section\n\n   \n# another header\n");
        assert!(output.records.is_empty());
        assert!(output.errors.is_empty());
        assert!(output.duplicate_groups.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let output = IngestionEngine::new().ingest("");
        assert!(output.records.is_empty());
        assert!(output.errors.is_empty());
    }

    #[test]
    fn test_error_spans_point_into_source() {
        let input = "##### Header\nbad line without anchors, 2020.\n";
        let output = IngestionEngine::new().ingest(input);

        assert_eq!(output.errors.len(), 1);
        let span = output.errors[0].span.as_ref().expect("span attached");
        assert_eq!(
            &input[span.start..span.end],
            "bad line without anchors, 2020."
        );
    }

    #[test]
    fn test_crlf_input() {
        let input = "##### H\r\nC. Li, \"A Sensor,\" IEEE Sensors Journal, vol. 1, no. 2, pp. 3-4, 2020, doi: 10.1109/JSEN.2020.1234567.\r\n";
        let output = IngestionEngine::new().ingest(input);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].title, "A Sensor");
    }

    #[test]
    fn test_records_keep_input_order() {
        let input = concat!(
            "B. Zhao, \"Second Paper,\" IEEE Sensors Journal, vol. 2, no. 1, pp. 5-9, 2019, doi: 10.1109/JSEN.2019.0000002.\n",
            "A. Yang, \"First Paper,\" IEEE Sensors Journal, vol. 1, no. 1, pp. 1-4, 2018, doi: 10.1109/JSEN.2018.0000001.\n",
        );
        let output = IngestionEngine::new().ingest(input);
        assert_eq!(output.records[0].title, "Second Paper");
        assert_eq!(output.records[1].title, "First Paper");
    }
}
