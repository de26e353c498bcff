//! Table-driven shift-reduce parser.
//!
//! Tokens are pulled from the [`Lexer`] one at a time. Each reduction runs a
//! semantic action that turns the popped values into statement records, so
//! the parser output is a flat list of [`Statement`]s with nested composites.

use std::str::FromStr;

use log::{debug, trace};
use tessera_core::{
    semantic::{AUTO_COLUMNS, ArrowKind, Direction, LineStroke},
    shape::ShapeKind,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    grammar::{PRODUCTIONS, Reduction},
    lexer::Lexer,
    parser_types::{EdgeDecl, Label, NodeDecl, Statement},
    span::{Position, Span, Spanned},
    table::{Action, parse_table},
    tokens::{PositionedToken, TokenKind},
};

type Statements = Vec<Spanned<Statement>>;

/// A node statement chain such as `a --> b --> c`.
#[derive(Debug)]
struct Chain {
    statements: Statements,
    tail: NodeDecl,
}

#[derive(Debug)]
struct Shape {
    kind: ShapeKind,
    label: Option<Label>,
    directions: Vec<Direction>,
}

#[derive(Debug)]
struct Link {
    label: Option<Label>,
    arrow_start: ArrowKind,
    arrow_end: ArrowKind,
    stroke: LineStroke,
}

/// Semantic value attached to a stack entry.
#[derive(Debug)]
enum Value<'a> {
    Token(PositionedToken<'a>),
    Statements(Statements),
    /// Statements of a `document`, stored last to first.
    Document(Statements),
    Statement(Spanned<Statement>),
    Chain(Chain),
    Node(NodeDecl),
    Shape(Shape),
    Directions(Vec<Direction>),
    Link(Link),
    Text(Label),
}

/// Popped right-hand side values of a reduction, consumed left to right.
struct Args<'a> {
    values: std::vec::IntoIter<(Value<'a>, Span)>,
}

impl<'a> Args<'a> {
    fn next(&mut self) -> (Value<'a>, Span) {
        self.values
            .next()
            .expect("reduction pops one value per right-hand side symbol")
    }

    fn token(&mut self) -> PositionedToken<'a> {
        match self.next().0 {
            Value::Token(token) => token,
            other => unreachable!("expected token, found {other:?}"),
        }
    }

    fn statements(&mut self) -> Statements {
        match self.next().0 {
            Value::Statements(statements) => statements,
            other => unreachable!("expected statements, found {other:?}"),
        }
    }

    /// Statements of a `document` in source order.
    fn document(&mut self) -> Statements {
        match self.next().0 {
            Value::Document(mut statements) => {
                statements.reverse();
                statements
            }
            other => unreachable!("expected document, found {other:?}"),
        }
    }

    fn reversed_document(&mut self) -> Statements {
        match self.next().0 {
            Value::Document(statements) => statements,
            other => unreachable!("expected document, found {other:?}"),
        }
    }

    fn statement(&mut self) -> Spanned<Statement> {
        match self.next().0 {
            Value::Statement(statement) => statement,
            other => unreachable!("expected statement, found {other:?}"),
        }
    }

    fn chain(&mut self) -> Chain {
        match self.next().0 {
            Value::Chain(chain) => chain,
            other => unreachable!("expected node chain, found {other:?}"),
        }
    }

    fn node(&mut self) -> (NodeDecl, Span) {
        match self.next() {
            (Value::Node(node), span) => (node, span),
            (other, _) => unreachable!("expected node, found {other:?}"),
        }
    }

    fn shape(&mut self) -> Shape {
        match self.next().0 {
            Value::Shape(shape) => shape,
            other => unreachable!("expected shape, found {other:?}"),
        }
    }

    fn directions(&mut self) -> Vec<Direction> {
        match self.next().0 {
            Value::Directions(directions) => directions,
            other => unreachable!("expected directions, found {other:?}"),
        }
    }

    fn link(&mut self) -> (Link, Span) {
        match self.next() {
            (Value::Link(link), span) => (link, span),
            (other, _) => unreachable!("expected link, found {other:?}"),
        }
    }

    fn text(&mut self) -> Label {
        match self.next().0 {
            Value::Text(label) => label,
            other => unreachable!("expected text, found {other:?}"),
        }
    }
}

pub(crate) struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    anonymous_blocks: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            anonymous_blocks: 0,
        }
    }

    /// Parses the whole source into top-level statements.
    pub(crate) fn parse(mut self) -> Result<Statements, Diagnostic> {
        let table = parse_table();
        let mut states: Vec<usize> = vec![0];
        let mut values: Vec<(Value<'a>, Span)> = Vec::new();
        let mut lookahead = self.lexer.next_token()?;

        loop {
            let state = *states.last().expect("state stack is never empty");
            match table.action(state, lookahead.kind) {
                Some(Action::Shift(next)) => {
                    trace!(state, next, kind:? = lookahead.kind; "Shift");
                    states.push(next);
                    values.push((Value::Token(lookahead), lookahead.span));
                    lookahead = self.lexer.next_token()?;
                }
                Some(Action::Reduce(index)) => {
                    let production = &PRODUCTIONS[index];
                    let arity = production.rhs.len();
                    let popped = values.split_off(values.len() - arity);
                    states.truncate(states.len() - arity);

                    let span = match (popped.first(), popped.last()) {
                        (Some((_, first)), Some((_, last))) => first.union(*last),
                        _ => Span::new(lookahead.span.start()..lookahead.span.start()),
                    };
                    let args = Args {
                        values: popped.into_iter(),
                    };
                    let value = self.reduce(production.reduction, args, span)?;

                    let top = *states.last().expect("state stack is never empty");
                    let next = table
                        .goto(top, production.lhs)
                        .expect("goto exists after every reduction");
                    states.push(next);
                    values.push((value, span));
                }
                Some(Action::Accept) => {
                    let statements = match values.pop() {
                        Some((Value::Statements(statements), _)) => statements,
                        _ => Vec::new(),
                    };
                    debug!(statements = statements.len(); "Parsed block diagram");
                    return Ok(statements);
                }
                None => return Err(self.syntax_error(state, lookahead)),
            }
        }
    }

    fn reduce(
        &mut self,
        reduction: Reduction,
        mut args: Args<'a>,
        span: Span,
    ) -> Result<Value<'a>, Diagnostic> {
        let value = match reduction {
            Reduction::Accept => unreachable!("the accept production is never reduced"),
            Reduction::Start => {
                args.token();
                Value::Statements(args.document())
            }
            Reduction::DocumentEmpty => Value::Document(Vec::new()),
            Reduction::DocumentCons => {
                let head = args.statements();
                let mut statements = args.reversed_document();
                statements.extend(head.into_iter().rev());
                Value::Document(statements)
            }
            Reduction::NodeStatement => Value::Statements(args.chain().statements),
            Reduction::Columns => {
                let token = args.token();
                let columns = parse_columns(token)?;
                single(Statement::Columns(columns), span)
            }
            Reduction::Space => {
                let token = args.token();
                let width = parse_space_width(token)?;
                single(Statement::Space { width }, span)
            }
            Reduction::Block => Value::Statements(vec![args.statement()]),
            Reduction::ClassDef | Reduction::ClassDefDefault => {
                args.token();
                let id = args.token();
                let declarations = args.token();
                let id = if reduction == Reduction::ClassDefDefault {
                    "default".to_string()
                } else {
                    id.text.trim().to_string()
                };
                single(
                    Statement::ClassDef {
                        id,
                        declarations: declarations.text.trim().to_string(),
                    },
                    span,
                )
            }
            Reduction::ApplyClass => {
                args.token();
                let ids = args.token();
                let class = args.token();
                single(
                    Statement::ApplyClass {
                        ids: ids.text.trim().to_string(),
                        class: class.text.trim().to_string(),
                    },
                    span,
                )
            }
            Reduction::ApplyStyles => {
                args.token();
                let ids = args.token();
                let declarations = args.token();
                single(
                    Statement::ApplyStyles {
                        ids: ids.text.trim().to_string(),
                        declarations: declarations.text.trim().to_string(),
                    },
                    span,
                )
            }
            Reduction::AccTitle => {
                args.token();
                let value = args.token();
                single(Statement::AccTitle(value.text.trim().to_string()), span)
            }
            Reduction::AccDescr => {
                args.token();
                let value = args.token();
                single(
                    Statement::AccDescription(value.text.trim().to_string()),
                    span,
                )
            }
            Reduction::AccDescrMultiline => {
                let value = args.token();
                single(
                    Statement::AccDescription(value.text.trim().to_string()),
                    span,
                )
            }
            Reduction::IdBlock => {
                args.token();
                let (mut node, _) = args.node();
                let children = args.document();
                node.shape = ShapeKind::Composite;
                Value::Statement(Spanned::new(Statement::Composite { node, children }, span))
            }
            Reduction::AnonymousBlock => {
                args.token();
                let children = args.document();
                self.anonymous_blocks += 1;
                let mut node = NodeDecl::new(format!("block-{}", self.anonymous_blocks));
                node.shape = ShapeKind::Composite;
                Value::Statement(Spanned::new(Statement::Composite { node, children }, span))
            }
            Reduction::ChainStart => {
                let (node, node_span) = args.node();
                Value::Chain(Chain {
                    statements: vec![Spanned::new(Statement::Node(node.clone()), node_span)],
                    tail: node,
                })
            }
            Reduction::ChainLink => {
                let mut chain = args.chain();
                let (link, link_span) = args.link();
                let (target, target_span) = args.node();
                let edge = EdgeDecl {
                    start: chain.tail.id.clone(),
                    end: target.id.clone(),
                    label: link.label,
                    arrow_start: link.arrow_start,
                    arrow_end: link.arrow_end,
                    stroke: link.stroke,
                    directions: target.directions.clone(),
                };
                chain
                    .statements
                    .push(Spanned::new(Statement::Edge(edge), link_span));
                chain
                    .statements
                    .push(Spanned::new(Statement::Node(target.clone()), target_span));
                chain.tail = target;
                Value::Chain(chain)
            }
            Reduction::NodeUnsized => Value::Node(args.node().0),
            Reduction::NodeSized => {
                let (mut node, _) = args.node();
                let size = args.token();
                node.width_in_columns = parse_number(size, size.text.trim_start_matches(':'))?;
                Value::Node(node)
            }
            Reduction::NodeBare => Value::Node(NodeDecl::new(args.token().text)),
            Reduction::NodeShaped => {
                let id = args.token();
                let shape = args.shape();
                let mut node = NodeDecl::new(id.text);
                node.shape = shape.kind;
                node.label = shape.label;
                node.directions = shape.directions;
                Value::Node(node)
            }
            Reduction::ShapeText => {
                let open = args.token();
                let label = args.text();
                let close = args.token();
                Value::Shape(Shape {
                    kind: ShapeKind::from_delimiters(open.text, close.text),
                    label: Some(label),
                    directions: Vec::new(),
                })
            }
            Reduction::ShapeEmpty => {
                let open = args.token();
                let close = args.token();
                Value::Shape(Shape {
                    kind: ShapeKind::from_delimiters(open.text, close.text),
                    label: None,
                    directions: Vec::new(),
                })
            }
            Reduction::ShapeArrow => {
                args.token();
                let label = args.text();
                let directions = args.directions();
                Value::Shape(Shape {
                    kind: ShapeKind::BlockArrow,
                    label: Some(label),
                    directions,
                })
            }
            Reduction::DirOne => {
                let direction = parse_direction(args.token())?;
                Value::Directions(vec![direction])
            }
            Reduction::DirCons => {
                let direction = parse_direction(args.token())?;
                let mut directions = vec![direction];
                directions.extend(args.directions());
                Value::Directions(directions)
            }
            Reduction::LinkPlain => {
                let link = args.token().text.trim();
                Value::Link(Link {
                    label: None,
                    arrow_start: start_marker(link),
                    arrow_end: end_marker(link),
                    stroke: LineStroke::from_link(link),
                })
            }
            Reduction::LinkLabelled => {
                let open = args.token().text.trim();
                args.token();
                let label = args.text();
                let close = args.token().text.trim();
                Value::Link(Link {
                    label: Some(label),
                    arrow_start: start_marker(open),
                    arrow_end: end_marker(close),
                    stroke: LineStroke::from_link(open),
                })
            }
            Reduction::TextPlain => Value::Text(Label {
                text: args.token().text.to_string(),
                markdown: false,
            }),
            Reduction::TextMarkdown => Value::Text(Label {
                text: args.token().text.to_string(),
                markdown: true,
            }),
        };
        Ok(value)
    }

    fn syntax_error(&self, state: usize, token: PositionedToken<'_>) -> Diagnostic {
        let position = Position::locate(self.source, token.span.start());
        let expected: Vec<&str> = parse_table()
            .expected(state)
            .into_iter()
            .map(TokenKind::describe)
            .collect();
        let help = format!("expected one of: {}", expected.join(", "));

        if token.kind == TokenKind::Eof {
            Diagnostic::error(format!(
                "unexpected end of input on line {}",
                position.line
            ))
            .with_code(ErrorCode::E101)
            .with_label(token.span, ErrorCode::E101.description())
            .with_help(help)
            .with_position(position)
        } else {
            let described = token.kind.describe();
            let found = if described.starts_with('`') {
                described.to_string()
            } else {
                format!("{described} `{}`", token.text.trim())
            };
            Diagnostic::error(format!("unexpected {found} on line {}", position.line))
            .with_code(ErrorCode::E100)
            .with_label(token.span, ErrorCode::E100.description())
            .with_help(help)
            .with_position(position)
        }
    }
}

fn single<'a>(statement: Statement, span: Span) -> Value<'a> {
    Value::Statements(vec![Spanned::new(statement, span)])
}

fn start_marker(link: &str) -> ArrowKind {
    link.chars()
        .next()
        .map(ArrowKind::from_start_char)
        .unwrap_or_default()
}

fn end_marker(link: &str) -> ArrowKind {
    link.chars()
        .last()
        .map(ArrowKind::from_end_char)
        .unwrap_or_default()
}

fn parse_number<T: FromStr>(token: PositionedToken<'_>, digits: &str) -> Result<T, Diagnostic> {
    digits.parse().map_err(|_| {
        Diagnostic::error(format!("`{}` is out of range", token.text.trim()))
            .with_code(ErrorCode::E204)
            .with_label(token.span, ErrorCode::E204.description())
    })
}

/// `columns auto` or `columns N`.
fn parse_columns(token: PositionedToken<'_>) -> Result<i32, Diagnostic> {
    let value = token.text.trim_start_matches("columns").trim();
    if value == "auto" {
        Ok(AUTO_COLUMNS)
    } else {
        parse_number(token, value)
    }
}

/// `space` or `space:N`.
fn parse_space_width(token: PositionedToken<'_>) -> Result<usize, Diagnostic> {
    match token.text.split_once(':') {
        Some((_, digits)) => parse_number(token, digits),
        None => Ok(1),
    }
}

fn parse_direction(token: PositionedToken<'_>) -> Result<Direction, Diagnostic> {
    let name = token.text.trim().trim_start_matches(',').trim();
    name.parse().map_err(|message: String| {
        Diagnostic::error(message)
            .with_code(ErrorCode::E100)
            .with_label(token.span, "arrow direction")
    })
}
