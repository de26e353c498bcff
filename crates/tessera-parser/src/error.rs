//! Error and diagnostic system for the block diagram parser.
//!
//! The error system is built around the [`Diagnostic`] type, which carries an
//! [`ErrorCode`], labelled source spans, optional help text, and for lexical
//! and syntax errors the line/column and a caret excerpt of the failure
//! position. Parsing stops at the first error, which is returned wrapped in a
//! [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use tessera_parser::error::{Diagnostic, ErrorCode};
//! # use tessera_parser::Span;
//!
//! let diag = Diagnostic::error("style target `b` is not declared")
//!     .with_code(ErrorCode::E202)
//!     .with_label(Span::new(11..18), "styled here")
//!     .with_help("declare `b` before styling it");
//!
//! assert_eq!(diag.to_string(), "error[E202]: style target `b` is not declared");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::Label;
pub use parse_error::ParseError;
