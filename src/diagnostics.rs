//! Pretty diagnostic reporting using [ariadne].
//!
//! Renders [`ParseError`] values with source-code context, underlines, and
//! labels, for human review of an ingestion run's error report.  Only
//! compiled when the `diagnostics` Cargo feature is enabled:
//!
//! ```toml
//! [dependencies]
//! citeline = { version = "0.1", features = ["diagnostics"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use citeline::IngestionEngine;
//!
//! let source = std::fs::read_to_string("publications.txt")?;
//! let output = IngestionEngine::new().ingest(&source);
//! for error in &output.errors {
//!     eprintln!("{}", error.to_diagnostic("publications.txt", &source));
//! }
//! ```

use crate::error::ParseError;

use ariadne::{Color, Label, Report, ReportKind, Source};

impl ParseError {
    /// Render this error as a pretty Ariadne diagnostic.
    ///
    /// The returned `String` contains ANSI colour codes when the terminal
    /// supports them.  Redirect to a file or pipe through `strip-ansi` if
    /// you need plain text.
    ///
    /// # Arguments
    ///
    /// * `filename` – Label shown in the report header (e.g. `"pubs.txt"`).
    /// * `source`   – The original source text that was ingested.
    pub fn to_diagnostic(&self, filename: &str, source: &str) -> String {
        let mut buf = Vec::new();

        let primary_range = self.primary_byte_range(source);
        let header_span = (filename, primary_range.clone());

        let report = Report::build(ReportKind::Error, header_span)
            .with_message(format!("{}", self))
            .with_label(
                Label::new((filename, primary_range))
                    .with_message(format!("{}", self.kind))
                    .with_color(Color::Red),
            );

        report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();

        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Compute a byte-range into `source` that best represents the error
    /// location, used for Ariadne label placement.
    ///
    /// Priority: explicit `span` > line-derived range > whole-file fallback.
    fn primary_byte_range(&self, source: &str) -> std::ops::Range<usize> {
        if let Some(ref span) = self.span {
            return span.start..span.end;
        }
        if let Some(line) = self.line {
            let line_start: usize = source
                .lines()
                .take(line.saturating_sub(1))
                .map(|l| l.len() + 1) // +1 for '\n'
                .sum();
            let line_len = source
                .lines()
                .nth(line.saturating_sub(1))
                .map(|l| l.len())
                .unwrap_or(0);
            return line_start..line_start + line_len;
        }
        // No position info — point at offset 0 (shows the first line).
        0..0
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ErrorKind, ParseError, SourceSpan, fields};

    #[test]
    fn test_to_diagnostic_with_span() {
        let source = "##### Header\nbad line, 2020.\n";
        let err = ParseError::at_line(2, ErrorKind::unrecognized("no quoted title anchor"))
            .with_span(SourceSpan::new(13, 28));

        let diag = err.to_diagnostic("pubs.txt", source);
        assert!(diag.contains("pubs.txt"));
    }

    #[test]
    fn test_to_diagnostic_line_only() {
        let source = "good line?\nanother line\n";
        let err = ParseError::at_line(
            2,
            ErrorKind::MissingField {
                field: fields::YEAR,
            },
        );

        let diag = err.to_diagnostic("pubs.txt", source);
        assert!(diag.contains("pubs.txt"));
    }

    #[test]
    fn test_to_diagnostic_no_position() {
        let source = "some content\n";
        let err = ParseError::without_position(ErrorKind::unrecognized("no doi: marker"));

        // Should not panic even without position info
        let diag = err.to_diagnostic("pubs.txt", source);
        assert!(diag.contains("pubs.txt"));
    }
}
