//! Token definitions for the block diagram lexer.
//!
//! [`TokenKind`] doubles as the terminal alphabet of the grammar, so every
//! variant corresponds to one terminal symbol.

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// `block-beta`
    BlockDiagramKey,
    /// `block` opening an anonymous composite
    Block,
    /// `block:` opening a composite with an id
    IdBlock,
    End,
    /// `columns N` or `columns auto`
    Columns,
    /// `space` or `space:N`
    SpaceBlock,
    NodeId,
    /// `:N` width in columns
    Size,
    NodeDStart,
    NodeDEnd,
    BlockArrowStart,
    BlockArrowEnd,
    Dir,
    Str,
    MdStr,
    Link,
    StartLink,
    LinkLabel,
    ClassDef,
    ClassDefId,
    DefaultClassDef,
    ClassDefStyleOpts,
    Class,
    ClassEntityIds,
    StyleClass,
    Style,
    StyleEntityIds,
    StyleDefinitionData,
    AccTitle,
    AccTitleValue,
    AccDescr,
    AccDescrValue,
    AccDescrMultilineValue,
    Eof,
}

impl TokenKind {
    /// Every terminal, in declaration order.
    pub const ALL: [TokenKind; 34] = [
        Self::BlockDiagramKey,
        Self::Block,
        Self::IdBlock,
        Self::End,
        Self::Columns,
        Self::SpaceBlock,
        Self::NodeId,
        Self::Size,
        Self::NodeDStart,
        Self::NodeDEnd,
        Self::BlockArrowStart,
        Self::BlockArrowEnd,
        Self::Dir,
        Self::Str,
        Self::MdStr,
        Self::Link,
        Self::StartLink,
        Self::LinkLabel,
        Self::ClassDef,
        Self::ClassDefId,
        Self::DefaultClassDef,
        Self::ClassDefStyleOpts,
        Self::Class,
        Self::ClassEntityIds,
        Self::StyleClass,
        Self::Style,
        Self::StyleEntityIds,
        Self::StyleDefinitionData,
        Self::AccTitle,
        Self::AccTitleValue,
        Self::AccDescr,
        Self::AccDescrValue,
        Self::AccDescrMultilineValue,
        Self::Eof,
    ];

    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Self::BlockDiagramKey => "`block-beta`",
            Self::Block => "`block`",
            Self::IdBlock => "`block:`",
            Self::End => "`end`",
            Self::Columns => "columns directive",
            Self::SpaceBlock => "space directive",
            Self::NodeId => "node id",
            Self::Size => "width (`:N`)",
            Self::NodeDStart => "shape opening bracket",
            Self::NodeDEnd => "shape closing bracket",
            Self::BlockArrowStart => "`<[`",
            Self::BlockArrowEnd => "`)`",
            Self::Dir => "arrow direction",
            Self::Str => "string",
            Self::MdStr => "markdown string",
            Self::Link => "link",
            Self::StartLink => "labelled link",
            Self::LinkLabel => "link label",
            Self::ClassDef => "`classDef`",
            Self::ClassDefId => "class name",
            Self::DefaultClassDef => "`DEFAULT`",
            Self::ClassDefStyleOpts => "class declarations",
            Self::Class => "`class`",
            Self::ClassEntityIds => "node ids",
            Self::StyleClass => "class name",
            Self::Style => "`style`",
            Self::StyleEntityIds => "node ids",
            Self::StyleDefinitionData => "style declarations",
            Self::AccTitle => "`accTitle:`",
            Self::AccTitleValue => "title text",
            Self::AccDescr => "`accDescr:`",
            Self::AccDescrValue => "description text",
            Self::AccDescrMultilineValue => "description text",
            Self::Eof => "end of input",
        }
    }

    /// Position of the terminal in [`TokenKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token with its source text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl<'a> PositionedToken<'a> {
    pub fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }
}
