//! Error codes for the block diagram diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexical errors
//! - `E1xx` - Syntax errors
//! - `E2xx` - Semantic errors found while populating the document

use std::fmt;

/// The class of failure an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unexpected input.
    ///
    /// No lexical rule of the current mode matches the upcoming text.
    E001,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser has no action for this token in its current state.
    E100,

    /// Unexpected end of input.
    ///
    /// The input ended before a complete statement was parsed, for example
    /// a `block` without its `end`.
    E101,

    // =========================================================================
    // Semantic Errors (E2xx)
    // =========================================================================
    /// Malformed style declaration.
    ///
    /// A `classDef` or `style` declaration is not of the form `property:value`.
    E200,

    /// Invalid color.
    ///
    /// A color-valued declaration such as `fill` does not hold a CSS color.
    E201,

    /// Undeclared style target.
    ///
    /// A `style` statement names a block that was never declared.
    E202,

    /// Block limit exceeded.
    ///
    /// The document would contain more blocks than the configured maximum.
    E203,

    /// Invalid number.
    ///
    /// A column count, spacer width or block width does not fit in range.
    E204,

    /// Block nested in itself.
    ///
    /// A composite lists itself, or one of its enclosing composites, among
    /// its own descendants.
    E205,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected input",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E200 => "malformed declaration",
            ErrorCode::E201 => "invalid color",
            ErrorCode::E202 => "undeclared style target",
            ErrorCode::E203 => "block limit exceeded",
            ErrorCode::E204 => "invalid number",
            ErrorCode::E205 => "block nested in itself",
        }
    }

    /// Returns the class of failure this code reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E001 => ErrorKind::Lexical,
            ErrorCode::E100 | ErrorCode::E101 => ErrorKind::Syntax,
            ErrorCode::E200
            | ErrorCode::E201
            | ErrorCode::E202
            | ErrorCode::E203
            | ErrorCode::E204
            | ErrorCode::E205 => ErrorKind::Semantic,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
