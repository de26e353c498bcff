//! # Tessera Parser
//!
//! Parser for the `block-beta` block diagram language. This crate turns
//! source text into a populated [`Document`]: a tree of blocks with a flat
//! id index, the edges between them, style classes and accessibility text.
//!
//! ## Usage
//!
//! ```
//! # use tessera_parser::{parse, ParseConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"block-beta
//!         columns 2
//!         a["Client"] --> b(("Server"))
//!     "#;
//!
//!     let document = parse(source, ParseConfig::default())?;
//!     assert_eq!(document.edges().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod error;
mod grammar;
mod lexer;
mod parser;
mod parser_types;
mod populate;
mod span;
mod table;
mod tokens;

pub use error::{Diagnostic, ErrorCode, ErrorKind, ParseError};
pub use lexer::tokenize;
pub use populate::ParseConfig;
pub use span::{Position, Span};
pub use tokens::{PositionedToken, TokenKind};

use log::info;
use tessera_core::semantic::Document;

use parser::Parser;
use populate::DocumentBuilder;

/// Parse source text into a populated document.
///
/// The pipeline runs in two stages:
///
/// 1. **Parse** - The LALR(1) parser pulls tokens from the mode-sensitive
///    lexer and reduces them into statement records
/// 2. **Populate** - Statements are folded into the block tree, the flat
///    index and the edge list
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the first [`Diagnostic`] encountered:
/// unmatched input, an unexpected token, a malformed style declaration or a
/// document larger than [`ParseConfig::max_blocks`].
pub fn parse(source: &str, config: ParseConfig) -> Result<Document, ParseError> {
    info!(bytes = source.len(); "Parsing block diagram");

    let statements = Parser::new(source).parse()?;

    let builder = DocumentBuilder::new(config, source);
    Ok(builder.build(statements)?)
}
