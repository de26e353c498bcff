//! Error types for Tessera operations.
//!
//! This module provides the main error type [`TesseraError`] which wraps
//! the error conditions of every pipeline stage, and [`LayoutError`] for
//! geometry preconditions checked by the layout engine.

use std::io;

use thiserror::Error;

use tessera_parser::ParseError;

/// The main error type for Tessera operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the structured parser
/// diagnostics so callers can render source snippets.
#[derive(Debug, Error)]
pub enum TesseraError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("edge `{edge}` references undeclared block `{block}`")]
    UnresolvedReference { edge: String, block: String },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl TesseraError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// A precondition of the layout engine that does not hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("column count must be a non-zero integer")]
    ZeroColumns,

    #[error("grid position must be non-negative, got {0}")]
    NegativePosition(i64),

    #[error("block `{block}` has non-finite geometry")]
    NonFiniteGeometry { block: String },

    #[error("padding must be a finite, non-negative number, got {0}")]
    InvalidPadding(f32),
}

#[cfg(test)]
mod tests {
    use tessera_parser::{Diagnostic, ErrorCode};

    use super::*;

    #[test]
    fn test_parse_error_keeps_source() {
        let err = ParseError::from(Diagnostic::error("boom").with_code(ErrorCode::E100));
        let err = TesseraError::new_parse_error(err, "block-beta\n");

        let TesseraError::Parse { src, .. } = &err else {
            panic!("Expected a parse error, got {err:?}");
        };
        assert_eq!(src, "block-beta\n");
    }

    #[test]
    fn test_layout_error_messages() {
        assert_eq!(
            TesseraError::from(LayoutError::ZeroColumns).to_string(),
            "Layout error: column count must be a non-zero integer"
        );
        assert_eq!(
            LayoutError::NonFiniteGeometry {
                block: "a".to_string()
            }
            .to_string(),
            "block `a` has non-finite geometry"
        );
    }
}
