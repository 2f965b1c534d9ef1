//! Error types for citation ingestion.
//!
//! This module defines a structured error hierarchy that provides detailed
//! information about per-line parsing failures, including line/column
//! positions and byte-offset spans into the original source text.

use thiserror::Error;

/// A byte-offset span into the original source text.
///
/// Both `start` and `end` are byte offsets (not character indices) from the
/// beginning of the source string.  `start` is inclusive, `end` is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpan {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl SourceSpan {
    /// Create a new `SourceSpan`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Field name constants for consistent error reporting.
pub mod fields {
    pub const AUTHORS: &str = "authors";
    pub const TITLE: &str = "title";
    pub const VENUE: &str = "venue";
    pub const LOCATION: &str = "location";
    pub const YEAR: &str = "year";
    pub const VOLUME: &str = "volume";
    pub const ISSUE: &str = "issue";
    pub const PAGES: &str = "pages";
    pub const DOI: &str = "doi";
}

/// Parse error with location information.
///
/// Produced for exactly one input line; a failed line never aborts the run.
/// The ingestion engine attaches the 1-based line number and the byte span
/// of the offending line before collecting the error into its report.
#[derive(Error, Debug)]
#[error("Unparsable citation{}: {kind}",
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {} column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        (None, Some(c)) => format!(" at column {}", c),
        (None, None) => String::new(),
    }
)]
pub struct ParseError {
    /// Line number where the error occurred (1-based, None if not available)
    pub line: Option<usize>,
    /// Column number where the error occurred (1-based, None if not available)
    pub column: Option<usize>,
    /// Byte-offset span into the source text, for rich diagnostic rendering.
    pub span: Option<SourceSpan>,
    /// The specific error that occurred
    pub kind: ErrorKind,
}

impl ParseError {
    /// Create a new ParseError.
    pub fn new(line: Option<usize>, column: Option<usize>, kind: ErrorKind) -> Self {
        Self {
            line,
            column,
            span: None,
            kind,
        }
    }

    /// Create a ParseError with just line information.
    pub fn at_line(line: usize, kind: ErrorKind) -> Self {
        Self::new(Some(line), None, kind)
    }

    /// Create a ParseError with just column information.
    ///
    /// Used by the tokenizer, which sees a single line and does not know its
    /// line number; the engine fills that in with [`ParseError::with_line`].
    pub fn at_column(column: usize, kind: ErrorKind) -> Self {
        Self::new(None, Some(column), kind)
    }

    /// Create a ParseError without position information.
    pub fn without_position(kind: ErrorKind) -> Self {
        Self::new(None, None, kind)
    }

    /// Attach a line number to this error, returning `self` (builder style).
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach a byte-offset span to this error, returning `self` (builder style).
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }
}

/// Specific error kinds that can occur while ingesting one citation line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The tokenizer could not locate a required anchor (quoted title or
    /// `doi:` marker); no partial record is emitted for the line.
    #[error("Unrecognized citation format: {reason}")]
    UnrecognizedFormat { reason: String },

    /// A required field normalized to empty.
    #[error("Missing value for {field}")]
    MissingField { field: &'static str },

    /// The DOI does not match the `10.NNNN/suffix` pattern.
    #[error("Bad DOI \"{value}\": expected the form 10.NNNN/suffix")]
    InvalidDoi { value: String },
}

impl ErrorKind {
    /// Shorthand for an [`ErrorKind::UnrecognizedFormat`] with a reason.
    pub(crate) fn unrecognized(reason: impl Into<String>) -> Self {
        ErrorKind::UnrecognizedFormat {
            reason: reason.into(),
        }
    }
}
