//! Statement records produced by the parser and consumed by the document builder.

use tessera_core::{
    semantic::{ArrowKind, Direction, LineStroke},
    shape::ShapeKind,
};

use crate::span::Spanned;

/// A quoted label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub markdown: bool,
}

/// A node or composite header as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    pub id: String,
    pub label: Option<Label>,
    pub shape: ShapeKind,
    pub directions: Vec<Direction>,
    pub width_in_columns: u32,
}

impl NodeDecl {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            shape: ShapeKind::Unknown,
            directions: Vec::new(),
            width_in_columns: 1,
        }
    }
}

/// One link of a node chain.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeDecl {
    pub start: String,
    pub end: String,
    pub label: Option<Label>,
    pub arrow_start: ArrowKind,
    pub arrow_end: ArrowKind,
    pub stroke: LineStroke,
    pub directions: Vec<Direction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Node(NodeDecl),
    Composite {
        node: NodeDecl,
        children: Vec<Spanned<Statement>>,
    },
    Space {
        width: usize,
    },
    Columns(i32),
    Edge(EdgeDecl),
    ClassDef {
        id: String,
        declarations: String,
    },
    ApplyClass {
        ids: String,
        class: String,
    },
    ApplyStyles {
        ids: String,
        declarations: String,
    },
    AccTitle(String),
    AccDescription(String),
}
