//! The core diagnostic type.

use thiserror::Error;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::{Position, Span},
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E001]: unexpected input `@` on line 2
///   --> diagram.blk:2:3
///    |
///  2 |   @a
///    |   ^ unexpected input
///    |
///    = help: block-beta
///      @a
///    --^
/// ```
#[derive(Debug, Clone, Error)]
#[error("error{}: {message}", code_tag(.code))]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
    position: Option<Position>,
    excerpt: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// ```
    /// # use tessera_parser::error::{Diagnostic, ErrorCode};
    /// # use tessera_parser::Span;
    /// let diag = Diagnostic::error("unexpected token `end`")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(Span::new(0..3), "not expected here");
    /// assert_eq!(diag.labels().len(), 1);
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            position: None,
            excerpt: None,
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Line and column of the failure, when known.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Caret rendering of the failure position, when known.
    pub fn excerpt(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }

    /// Span of the first primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }
}

/// `[E001]` for a coded diagnostic, nothing otherwise.
fn code_tag(code: &Option<ErrorCode>) -> String {
    code.map(|code| format!("[{code}]")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::error("test error");

        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert!(diag.position().is_none());
    }

    #[test]
    fn test_diagnostic_primary_span() {
        let diag = Diagnostic::error("missing end")
            .with_secondary_label(Span::new(0..5), "block opened here")
            .with_label(Span::new(20..20), "input ends here");

        assert_eq!(diag.primary_span(), Some(Span::new(20..20)));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("unexpected token").with_code(ErrorCode::E100);
        assert_eq!(diag.to_string(), "error[E100]: unexpected token");
        assert_eq!(Diagnostic::error("plain").to_string(), "error: plain");
    }
}
