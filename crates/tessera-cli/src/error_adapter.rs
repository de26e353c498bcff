//! Renders [`TesseraError`] through miette.
//!
//! A parse error yields one [`Report`] per diagnostic, each pointing into the
//! diagram source. Every other error yields a single spanless report with a
//! `tessera::*` code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceCode, SourceSpan};

use tessera::TesseraError;
use tessera_parser::error::Diagnostic;

/// One renderable failure.
#[derive(Debug)]
pub enum Report<'a> {
    /// A parser diagnostic and the source it was reported against.
    Located { diag: &'a Diagnostic, src: &'a str },
    /// A library error without a source location.
    Plain(&'a TesseraError),
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Located { diag, .. } => f.write_str(diag.message()),
            Report::Plain(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Report::Located { .. } => None,
            Report::Plain(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code: Box<dyn fmt::Display> = match self {
            Report::Located { diag, .. } => Box::new(diag.code()?),
            Report::Plain(err) => Box::new(plain_code(err)?),
        };
        Some(code)
    }

    /// Falls back to the caret excerpt for lexical errors, which carry no help.
    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: Box<dyn fmt::Display + 'a> = match self {
            Report::Located { diag, .. } => Box::new(diag.help().or(diag.excerpt())?),
            Report::Plain(TesseraError::UnresolvedReference { block, .. }) => Box::new(format!(
                "declare `{block}` as a node before linking to it"
            )),
            Report::Plain(_) => return None,
        };
        Some(help)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            Report::Located { src, .. } => Some(src as &dyn SourceCode),
            Report::Plain(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Located { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let span = SourceSpan::new(label.span().start().into(), label.span().len());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn plain_code(err: &TesseraError) -> Option<&'static str> {
    let code = match err {
        TesseraError::Io(_) => "tessera::io",
        TesseraError::Parse { .. } => return None,
        TesseraError::UnresolvedReference { .. } => "tessera::unresolved_reference",
        TesseraError::Layout(_) => "tessera::layout",
        TesseraError::Config(_) => "tessera::config",
        TesseraError::Export(_) => "tessera::export",
    };
    Some(code)
}

/// Splits an error into the reports to render, in order.
pub fn reports(err: &TesseraError) -> Vec<Report<'_>> {
    match err {
        TesseraError::Parse { err, src } => err
            .diagnostics()
            .iter()
            .map(|diag| Report::Located { diag, src })
            .collect(),
        _ => vec![Report::Plain(err)],
    }
}

#[cfg(test)]
mod tests {
    use tessera::LayoutError;
    use tessera_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    fn code_of(report: &Report<'_>) -> Option<String> {
        report.code().map(|code| code.to_string())
    }

    fn help_of(report: &Report<'_>) -> Option<String> {
        report.help().map(|help| help.to_string())
    }

    #[test]
    fn test_unclosed_block_points_at_source() {
        let diag = Diagnostic::error("unexpected end of input")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(11..18), "block opened here")
            .with_help("close the block with `end`");
        let err = TesseraError::new_parse_error(ParseError::from(diag), "block-beta\nblock:g");

        let rendered = reports(&err);
        let [report] = rendered.as_slice() else {
            panic!("Expected one report, got {}", rendered.len());
        };
        assert_eq!(report.to_string(), "unexpected end of input");
        assert_eq!(code_of(report).as_deref(), Some("E101"));
        assert_eq!(help_of(report).as_deref(), Some("close the block with `end`"));
        assert!(report.source_code().is_some());

        let labels: Vec<_> = report.labels().expect("labels").collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 11);
        assert_eq!(labels[0].len(), 7);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_lexical_error_shows_excerpt_as_help() {
        let diag = Diagnostic::error("unexpected input `b` on line 2")
            .with_code(ErrorCode::E001)
            .with_label(Span::new(13..14), "unexpected input")
            .with_excerpt("block-beta a[b]\n------------^");
        let err = TesseraError::new_parse_error(ParseError::from(diag), "block-beta\na[b]");

        let rendered = reports(&err);
        assert_eq!(
            help_of(&rendered[0]).as_deref(),
            Some("block-beta a[b]\n------------^")
        );
    }

    #[test]
    fn test_each_diagnostic_is_reported() {
        let diags = vec![
            Diagnostic::error("invalid color `nope` for `fill`").with_code(ErrorCode::E201),
            Diagnostic::error("style target `b` is not declared")
                .with_code(ErrorCode::E202)
                .with_secondary_label(Span::new(0..5), "styled here"),
        ];
        let err = TesseraError::new_parse_error(ParseError::from(diags), "style b fill:nope");

        let rendered = reports(&err);
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].labels().is_none());
        assert_eq!(code_of(&rendered[1]).as_deref(), Some("E202"));
        let labels: Vec<_> = rendered[1].labels().expect("labels").collect();
        assert!(!labels[0].primary());
    }

    #[test]
    fn test_library_errors_are_plain() {
        let err = TesseraError::Layout(LayoutError::ZeroColumns);
        let rendered = reports(&err);
        assert_eq!(code_of(&rendered[0]).as_deref(), Some("tessera::layout"));
        assert!(rendered[0].source_code().is_none());
        assert!(help_of(&rendered[0]).is_none());

        let err = TesseraError::UnresolvedReference {
            edge: "1-a-b".to_string(),
            block: "b".to_string(),
        };
        let rendered = reports(&err);
        assert_eq!(
            rendered[0].to_string(),
            "edge `1-a-b` references undeclared block `b`"
        );
        assert_eq!(
            help_of(&rendered[0]).as_deref(),
            Some("declare `b` as a node before linking to it")
        );
    }
}
