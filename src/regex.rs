//! Regex engine selection.
//!
//! The crate compiles against either the full `regex` crate (default) or
//! `regex-lite` (enable the `lite` feature and disable default features for
//! smaller binaries). Both expose the same API surface used here.

#[cfg(feature = "regex")]
pub(crate) use regex::Regex;

#[cfg(all(feature = "lite", not(feature = "regex")))]
pub(crate) use regex_lite::Regex;

#[cfg(not(any(feature = "regex", feature = "lite")))]
compile_error!("citeline requires either the `regex` (default) or `lite` feature");
