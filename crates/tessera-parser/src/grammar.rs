//! The block diagram grammar.
//!
//! ```text
//! start          → BLOCK_DIAGRAM_KEY document
//! document       → ε | statement document
//! statement      → nodeStatement | COLUMNS | SPACE_BLOCK | blockStatement
//!                | CLASSDEF (CLASSDEF_ID | DEFAULT) CLASSDEF_STYLEOPTS
//!                | CLASS CLASSENTITY_IDS STYLECLASS
//!                | STYLE STYLE_ENTITY_IDS STYLE_DEFINITION_DATA
//!                | ACC_TITLE ACC_TITLE_VALUE | ACC_DESCR ACC_DESCR_VALUE
//!                | ACC_DESCR_MULTILINE_VALUE
//! blockStatement → ID_BLOCK sizedNode document END | BLOCK document END
//! nodeStatement  → nodeStatement link sizedNode | sizedNode
//! sizedNode      → node | node SIZE
//! node           → NODE_ID | NODE_ID shape
//! shape          → NODE_DSTART text NODE_DEND | NODE_DSTART NODE_DEND
//!                | BLOCK_ARROW_START text dirList BLOCK_ARROW_END
//! dirList        → DIR | DIR dirList
//! link           → LINK | START_LINK LINK_LABEL text LINK
//! text           → STR | MD_STR
//! ```
//!
//! Production 0 is the augmented `accept → start`, accepted on end of input.

use std::fmt;

use crate::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum NonTerminal {
    Accept,
    Start,
    Document,
    Statement,
    BlockStatement,
    NodeStatement,
    SizedNode,
    Node,
    Shape,
    DirList,
    Link,
    Text,
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Symbol {
    Terminal(TokenKind),
    Nonterminal(NonTerminal),
}

/// Semantic action run when a production is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reduction {
    Accept,
    Start,
    DocumentEmpty,
    DocumentCons,
    NodeStatement,
    Columns,
    Space,
    Block,
    ClassDef,
    ClassDefDefault,
    ApplyClass,
    ApplyStyles,
    AccTitle,
    AccDescr,
    AccDescrMultiline,
    IdBlock,
    AnonymousBlock,
    ChainLink,
    ChainStart,
    NodeUnsized,
    NodeSized,
    NodeBare,
    NodeShaped,
    ShapeText,
    ShapeEmpty,
    ShapeArrow,
    DirOne,
    DirCons,
    LinkPlain,
    LinkLabelled,
    TextPlain,
    TextMarkdown,
}

#[derive(Debug)]
pub(crate) struct Production {
    pub lhs: NonTerminal,
    pub rhs: &'static [Symbol],
    pub reduction: Reduction,
}

use NonTerminal as NT;
use Symbol::{Nonterminal as N, Terminal as T};
use TokenKind as K;

macro_rules! production {
    ($lhs:expr => [$($sym:expr),*] => $reduction:expr) => {
        Production {
            lhs: $lhs,
            rhs: &[$($sym),*],
            reduction: $reduction,
        }
    };
}

pub(crate) static PRODUCTIONS: &[Production] = &[
    production!(NT::Accept => [N(NT::Start)] => Reduction::Accept),
    production!(NT::Start => [T(K::BlockDiagramKey), N(NT::Document)] => Reduction::Start),
    production!(NT::Document => [] => Reduction::DocumentEmpty),
    production!(NT::Document => [N(NT::Statement), N(NT::Document)] => Reduction::DocumentCons),
    production!(NT::Statement => [N(NT::NodeStatement)] => Reduction::NodeStatement),
    production!(NT::Statement => [T(K::Columns)] => Reduction::Columns),
    production!(NT::Statement => [T(K::SpaceBlock)] => Reduction::Space),
    production!(NT::Statement => [N(NT::BlockStatement)] => Reduction::Block),
    production!(NT::Statement => [T(K::ClassDef), T(K::ClassDefId), T(K::ClassDefStyleOpts)] => Reduction::ClassDef),
    production!(NT::Statement => [T(K::ClassDef), T(K::DefaultClassDef), T(K::ClassDefStyleOpts)] => Reduction::ClassDefDefault),
    production!(NT::Statement => [T(K::Class), T(K::ClassEntityIds), T(K::StyleClass)] => Reduction::ApplyClass),
    production!(NT::Statement => [T(K::Style), T(K::StyleEntityIds), T(K::StyleDefinitionData)] => Reduction::ApplyStyles),
    production!(NT::Statement => [T(K::AccTitle), T(K::AccTitleValue)] => Reduction::AccTitle),
    production!(NT::Statement => [T(K::AccDescr), T(K::AccDescrValue)] => Reduction::AccDescr),
    production!(NT::Statement => [T(K::AccDescrMultilineValue)] => Reduction::AccDescrMultiline),
    production!(NT::BlockStatement => [T(K::IdBlock), N(NT::SizedNode), N(NT::Document), T(K::End)] => Reduction::IdBlock),
    production!(NT::BlockStatement => [T(K::Block), N(NT::Document), T(K::End)] => Reduction::AnonymousBlock),
    production!(NT::NodeStatement => [N(NT::NodeStatement), N(NT::Link), N(NT::SizedNode)] => Reduction::ChainLink),
    production!(NT::NodeStatement => [N(NT::SizedNode)] => Reduction::ChainStart),
    production!(NT::SizedNode => [N(NT::Node)] => Reduction::NodeUnsized),
    production!(NT::SizedNode => [N(NT::Node), T(K::Size)] => Reduction::NodeSized),
    production!(NT::Node => [T(K::NodeId)] => Reduction::NodeBare),
    production!(NT::Node => [T(K::NodeId), N(NT::Shape)] => Reduction::NodeShaped),
    production!(NT::Shape => [T(K::NodeDStart), N(NT::Text), T(K::NodeDEnd)] => Reduction::ShapeText),
    production!(NT::Shape => [T(K::NodeDStart), T(K::NodeDEnd)] => Reduction::ShapeEmpty),
    production!(NT::Shape => [T(K::BlockArrowStart), N(NT::Text), N(NT::DirList), T(K::BlockArrowEnd)] => Reduction::ShapeArrow),
    production!(NT::DirList => [T(K::Dir)] => Reduction::DirOne),
    production!(NT::DirList => [T(K::Dir), N(NT::DirList)] => Reduction::DirCons),
    production!(NT::Link => [T(K::Link)] => Reduction::LinkPlain),
    production!(NT::Link => [T(K::StartLink), T(K::LinkLabel), N(NT::Text), T(K::Link)] => Reduction::LinkLabelled),
    production!(NT::Text => [T(K::Str)] => Reduction::TextPlain),
    production!(NT::Text => [T(K::MdStr)] => Reduction::TextMarkdown),
];

/// Index of the augmented start production.
pub(crate) const ACCEPT_PRODUCTION: usize = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_production_is_first() {
        assert_eq!(PRODUCTIONS[ACCEPT_PRODUCTION].lhs, NT::Accept);
        assert_eq!(PRODUCTIONS[ACCEPT_PRODUCTION].reduction, Reduction::Accept);
    }

    #[test]
    fn test_every_nonterminal_has_a_production() {
        let nonterminals = [
            NT::Start,
            NT::Document,
            NT::Statement,
            NT::BlockStatement,
            NT::NodeStatement,
            NT::SizedNode,
            NT::Node,
            NT::Shape,
            NT::DirList,
            NT::Link,
            NT::Text,
        ];
        for nt in nonterminals {
            assert!(PRODUCTIONS.iter().any(|p| p.lhs == nt), "{nt} has no production");
        }
    }
}
